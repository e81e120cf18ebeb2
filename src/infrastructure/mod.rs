//! 基础设施层：外部识别器的接口与实现

pub mod handwriting;
pub mod item_ocr;
pub mod recognizer;
pub mod replay;

pub use handwriting::{HandwriteLabel, HandwritingPrediction, DEFAULT_CONFIDENCE_THRESHOLD};
pub use item_ocr::clean_ocr_text;
pub use recognizer::{HandwritingClassifier, ItemOcrEngine};
pub use replay::RecordedReadings;
