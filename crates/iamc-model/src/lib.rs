pub mod code;
pub mod codelist;
pub mod error;
pub mod value;

pub use code::{Code, Tag};
pub use codelist::CodeList;
pub use error::{ModelError, Result};
pub use value::AttrValue;
