// Resume analysis: PDF text extraction plus keyword heuristics for name, position,
// skills, experience and summary. No scoring happens here.

pub mod analyzer;
pub mod extractor;
pub mod vocabulary;

pub use analyzer::{Analysis, ExperiencePolicy, TextAnalyzer};
pub use extractor::{PdfTextExtractor, TextExtractor};
