use crate::model::ServicePackage;

/// Items matching `query` (case-insensitive) on any displayed field or the id, in original order.
pub fn filter_services<'a>(items: &'a [ServicePackage], query: &str) -> Vec<&'a ServicePackage> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&q)
                || s.price.to_string().to_lowercase().contains(&q)
                || s.duration.to_string().to_lowercase().contains(&q)
                || s.accuracy.to_string().to_lowercase().contains(&q)
                || s.id.as_str().to_lowercase().contains(&q)
        })
        .collect()
}
