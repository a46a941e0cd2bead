// src/infrastructure/mod.rs
//
// PostgreSQL repositories, units of work and the ACL adapters wiring the
// bounded contexts together.

pub mod dashboard;
pub mod grade;
pub mod module;
pub mod subject;
pub mod submission;

/// True when `err` is a violation of the named unique constraint or index.
pub(crate) fn violates_constraint(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Substring pattern for `ILIKE`. `%`, `_` and `\` in the keyword match literally.
pub(crate) fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("algebra"), "%algebra%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }
}
