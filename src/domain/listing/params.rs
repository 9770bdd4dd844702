use super::schema::SortDir;

/// Parameters of one advanced-search request.
///
/// Absent filters, blank text filters and a blank query are already left out;
/// the query is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub q: Option<String>,
    pub filters: Vec<(&'static str, String)>,
    pub order_by: &'static str,
    pub order_dir: SortDir,
    pub limit: u64,
    pub offset: u64,
}

impl FetchParams {
    /// Value of the filter named `name`, if it is sent.
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Query-string pairs in wire order: `q`, filters, `order_by`,
    /// `order_dir`, `limit`, `offset`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 5);
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs.push(("order_by", self.order_by.to_string()));
        pairs.push(("order_dir", self.order_dir.as_param().to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FetchParams {
        FetchParams {
            q: Some("perez".to_string()),
            filters: vec![("activo", "true".to_string())],
            order_by: "apellido",
            order_dir: SortDir::Asc,
            limit: 10,
            offset: 20,
        }
    }

    #[test]
    fn query_pairs_follow_wire_order() {
        let pairs = params().to_query_pairs();
        let keys: Vec<_> = pairs.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            ["q", "activo", "order_by", "order_dir", "limit", "offset"]
        );
        assert_eq!(pairs[3].1, "asc");
        assert_eq!(pairs[5].1, "20");
    }

    #[test]
    fn missing_query_is_not_sent() {
        let params = FetchParams { q: None, ..params() };
        assert!(params.to_query_pairs().iter().all(|(key, _)| *key != "q"));
        assert_eq!(params.filter("activo"), Some("true"));
        assert_eq!(params.filter("dni"), None);
    }
}
