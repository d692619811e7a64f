use catalog::model::{Client, Notification, Product, Release};

/// Records the list search box filters on.
pub trait Searchable {
    /// Text fields the search term is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.sku.as_str()]
    }
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.primary_contact.as_str(),
            self.email.as_str(),
        ]
    }
}

impl Searchable for Release {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.version.as_str()];
        fields.extend(self.title.as_deref());
        fields.extend(self.product_name.as_deref());
        fields
    }
}

impl Searchable for Notification {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.message.as_str(), self.kind.as_str()]
    }
}

/// Case-insensitive substring match on any field. An empty term matches.
/// Whitespace in the term is matched as typed.
pub fn matches(term: &str, fields: &[&str]) -> bool {
    let term = term.to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}

/// Records matching `term`, in mirror order.
pub fn search<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches(term, &item.search_fields()))
        .collect()
}
