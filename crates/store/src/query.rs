//! Query builder for table selects
//!
//! Mirrors the subset of the PostgREST query language the adapter needs:
//! column projection, equality filters, a single ordering and a row limit.

use serde_json::Value;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// A select against one table
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    columns: Vec<String>,
    filters: Vec<(String, Value)>,
    order: Option<(String, Direction)>,
    limit: Option<usize>,
}

impl Query {
    /// Start a query selecting every column of `table`
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Builder: restrict the returned columns
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Builder: keep rows where `column == value`
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Builder: sort by `column`
    pub fn order(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    /// Builder: return at most `n` rows
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    // ========== Getters ==========

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Selected columns; empty means all
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }

    pub fn ordering(&self) -> Option<(&str, Direction)> {
        self.order.as_ref().map(|(c, d)| (c.as_str(), *d))
    }

    pub fn max_rows(&self) -> Option<usize> {
        self.limit
    }

    /// The `select=` clause
    pub fn select_clause(&self) -> String {
        if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        }
    }

    /// Query-string parameters in PostgREST syntax
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select_clause())];

        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{}", filter_literal(value))));
        }

        if let Some((column, direction)) = &self.order {
            params.push(("order".to_string(), format!("{}.{}", column, direction.as_str())));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

fn filter_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_everything() {
        let query = Query::from_table("game_saves");
        assert_eq!(query.select_clause(), "*");
        assert_eq!(
            query.to_params(),
            vec![("select".to_string(), "*".to_string())]
        );
    }

    #[test]
    fn test_params_in_postgrest_syntax() {
        let query = Query::from_table("game_saves")
            .eq("player_name", "alice")
            .order("updated_at", Direction::Descending)
            .limit(1);

        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("player_name".to_string(), "eq.alice".to_string()),
                ("order".to_string(), "updated_at.desc".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_projection_and_numeric_filter() {
        let query = Query::from_table("game_statistics")
            .select(&["player_name", "total_plays"])
            .eq("total_plays", 3);

        assert_eq!(query.select_clause(), "player_name,total_plays");
        assert!(query
            .to_params()
            .contains(&("total_plays".to_string(), "eq.3".to_string())));
    }
}
