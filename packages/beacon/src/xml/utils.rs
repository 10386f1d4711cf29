//! Namespace-aware helpers for navigating roxmltree DOM trees.

use roxmltree::Node;

use super::qname::QName;

/// Find all child elements with the given qualified name, in document order.
pub fn find_children<'a, 'input, 'n>(
    node: Node<'a, 'input>,
    name: &'n QName,
) -> impl Iterator<Item = Node<'a, 'input>> + 'n
where
    'a: 'n,
    'input: 'n,
{
    node.children().filter(move |child| name.matches(*child))
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get the trimmed text content of a node, or `None` when it is empty.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use tei_beacon::xml::non_empty_text;
///
/// let doc = Document::parse("<idno>  123 </idno>").unwrap();
/// assert_eq!(non_empty_text(doc.root_element()), Some("123"));
///
/// let doc = Document::parse("<idno>   </idno>").unwrap();
/// assert_eq!(non_empty_text(doc.root_element()), None);
/// ```
pub fn non_empty_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|s| !s.is_empty())
}
