// 🧮 Generic Query Utilities
// Name search and foreign-key grouping, shared by every entity kind

use crate::entities::Record;
use std::collections::BTreeMap;

/// Case-insensitive substring search over `name_field`.
///
/// Localized names match on `en` or `local`. An empty term matches every
/// record that has the field; callers decide whether that means "match all".
pub fn search_by_name<'a, T: Record>(items: &'a [T], term: &str, name_field: &str) -> Vec<&'a T> {
    let term = term.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.field(name_field)
                .map(|value| value.contains_ignore_case(&term))
                .unwrap_or(false)
        })
        .collect()
}

/// `search_by_name` against the kind's default name field
pub fn search<'a, T: Record>(items: &'a [T], term: &str) -> Vec<&'a T> {
    search_by_name(items, term, T::NAME_FIELD)
}

/// Stable partition of `items` by the value of `field`.
///
/// Records without the field are left out. A list-valued field puts the record
/// in one group per element.
pub fn group_by_field<'a, T: Record>(items: &'a [T], field: &str) -> BTreeMap<String, Vec<&'a T>> {
    let mut groups: BTreeMap<String, Vec<&'a T>> = BTreeMap::new();

    for item in items {
        if let Some(value) = item.field(field) {
            for key in value.group_keys() {
                groups.entry(key.to_string()).or_default().push(item);
            }
        }
    }

    groups
}
