pub mod answer;
pub mod answer_key;
pub mod grade;
pub mod loaders;
pub mod page;
pub mod region;

pub use answer::{AnswerRecord, FinalMap};
pub use answer_key::{AnswerKey, AnswerKeyEntry};
pub use grade::{GradeDetail, GradeResult};
pub use loaders::{
    load_all_page_dumps, load_answer_key, load_page_dump, LoadedPages, PageLoadFailure,
};
pub use page::{PageDump, RecordedDetection, RecordedHandwriting};
pub use region::{BoundingBox, RawDetection, Region, RegionClass};
