//! XML access: qualified names, DOM helpers and the document accessor.

mod accessor;
mod qname;
mod utils;

pub use accessor::{DocumentAccessor, ItemFilter, SubIdentifier};
pub use qname::{qualified_name, resolve_attribute_name, resolve_element_name, QName};
pub use utils::{element_children, find_children, non_empty_text};
