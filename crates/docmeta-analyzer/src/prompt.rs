//! LLM prompt engineering for metadata extraction

/// Shape a metadata field is expected to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Free text
    Text,
    /// List of strings
    TextList,
    /// Number, or the text "Not Available"
    NumberOrText,
}

impl FieldShape {
    fn describe(&self) -> &'static str {
        match self {
            FieldShape::Text => "string",
            FieldShape::TextList => "array of strings",
            FieldShape::NumberOrText => "integer, or \"Not Available\"",
        }
    }
}

/// One field the model is asked to fill in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataField {
    /// JSON key
    pub name: String,
    /// Expected value shape
    pub shape: FieldShape,
    /// What the field means
    pub description: String,
}

impl MetadataField {
    /// Create a field description
    pub fn new(name: impl Into<String>, shape: FieldShape, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape,
            description: description.into(),
        }
    }
}

/// The set of fields requested from the model for every chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSchema {
    fields: Vec<MetadataField>,
}

impl MetadataSchema {
    /// Create a schema from an explicit field list
    pub fn new(fields: Vec<MetadataField>) -> Self {
        Self { fields }
    }

    /// Fields in this schema
    pub fn fields(&self) -> &[MetadataField] {
        &self.fields
    }

    /// Render the format instructions handed to the extractor as its format hint
    pub fn format_instructions(&self) -> String {
        let mut out = String::from(
            "Return a single JSON object with exactly these keys. \
             Use null for anything the text does not mention.\n\n{\n",
        );
        for (i, field) in self.fields.iter().enumerate() {
            let comma = if i + 1 < self.fields.len() { "," } else { "" };
            out.push_str(&format!(
                "  \"{}\": <{}>{}  // {}\n",
                field.name,
                field.shape.describe(),
                comma,
                field.description
            ));
        }
        out.push('}');
        out
    }
}

impl Default for MetadataSchema {
    /// General-purpose document metadata
    fn default() -> Self {
        Self::new(vec![
            MetadataField::new("Summary", FieldShape::TextList, "Key points of the text"),
            MetadataField::new("Title", FieldShape::Text, "Document title"),
            MetadataField::new("Author", FieldShape::TextList, "Named authors"),
            MetadataField::new("DateCreated", FieldShape::Text, "Creation date"),
            MetadataField::new("LastModifiedDate", FieldShape::Text, "Last modification date"),
            MetadataField::new("Publisher", FieldShape::Text, "Publishing organisation"),
            MetadataField::new("Language", FieldShape::Text, "Primary language"),
            MetadataField::new("PageCount", FieldShape::NumberOrText, "Number of pages"),
            MetadataField::new("SentimentTone", FieldShape::Text, "Overall tone"),
        ])
    }
}

/// Builds the document-analysis prompt for one chunk
pub struct PromptBuilder<'a> {
    text: &'a str,
    format_instructions: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str, format_instructions: &'a str) -> Self {
        Self {
            text,
            format_instructions,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(ANALYSIS_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(self.format_instructions);
        prompt.push_str("\n\n");

        prompt.push_str("Text to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// Build a prompt asking the model to fix output that failed to parse
pub fn build_repair_prompt(format_instructions: &str, completion: &str, error: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(REPAIR_INSTRUCTIONS);
    prompt.push_str("\n\nInstructions:\n");
    prompt.push_str(format_instructions);
    prompt.push_str("\n\nCompletion:\n---\n");
    prompt.push_str(completion);
    prompt.push_str("\n---\n\nError:\n");
    prompt.push_str(error);
    prompt.push_str("\n\n");
    prompt.push_str(OUTPUT_FORMAT_REMINDER);

    prompt
}

const ANALYSIS_INSTRUCTIONS: &str = r#"You are a highly capable assistant trained to analyze and summarize documents.
Extract metadata from the following excerpt. The excerpt may be one part of a
longer document, so describe only what this excerpt supports.

Rules:
- Do not invent values; use null when the excerpt says nothing about a field
- Keep summaries concise and factual
- Copy names and titles exactly as written"#;

const REPAIR_INSTRUCTIONS: &str = r#"The completion below did not satisfy the output constraints.
Rewrite it so that it does, keeping every value the completion already contains."#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Remember: Return ONLY valid JSON, no markdown code blocks, no explanations.";
