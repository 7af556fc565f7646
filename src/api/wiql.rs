//! WIQL (Work Item Query Language) text generation.
//!
//! WIQL has no bind parameters, so caller-supplied values end up inside
//! string literals. Every literal goes through [`quote_literal`], which
//! doubles embedded single quotes, and values with control characters are
//! refused before any text is built.

use crate::core::validation::ensure_wiql_literal;
use crate::error::RelayResult;

/// Wraps `value` in single quotes, doubling any quote inside it.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Builds the query selecting work items assigned to `member_email` in the
/// iteration at `iteration_path`, limited to the team's area paths.
///
/// `@project` and `@TeamAreas` take their values from the project and team
/// of the WIQL route the query is posted to.
pub fn member_iteration_query(member_email: &str, iteration_path: &str) -> RelayResult<String> {
    ensure_wiql_literal("memberId", member_email)?;
    ensure_wiql_literal("iteration", iteration_path)?;

    Ok(format!(
        "SELECT [System.Id] FROM WorkItems \
         WHERE [System.TeamProject] = @project \
         AND [System.AreaPath] IN (@TeamAreas) \
         AND [System.IterationPath] = {} \
         AND [System.AssignedTo] = {} \
         ORDER BY [System.Id]",
        quote_literal(iteration_path),
        quote_literal(member_email),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;

    #[test]
    fn test_member_iteration_query_text() {
        let query = member_iteration_query("dana@example.com", r"Relay\Sprint 4").unwrap();
        insta::assert_snapshot!(query, @r"SELECT [System.Id] FROM WorkItems WHERE [System.TeamProject] = @project AND [System.AreaPath] IN (@TeamAreas) AND [System.IterationPath] = 'Relay\Sprint 4' AND [System.AssignedTo] = 'dana@example.com' ORDER BY [System.Id]");
    }

    /// # Team Scoping
    ///
    /// ## Test Scenario
    /// - Build the query for an iteration path other teams may also use
    ///
    /// ## Expected Outcome
    /// - The query restricts area paths to the team of the route
    /// - The team clause precedes the caller-supplied literals
    #[test]
    fn test_query_is_scoped_to_team_areas() {
        let query = member_iteration_query("dana@example.com", r"Relay\Sprint 4").unwrap();

        let team_clause = query
            .find("[System.AreaPath] IN (@TeamAreas)")
            .expect("team clause missing");
        let iteration_clause = query.find("[System.IterationPath]").unwrap();
        assert!(team_clause < iteration_clause);
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(quote_literal("o'brien@example.com"), "'o''brien@example.com'");
        assert_eq!(quote_literal("''"), "''''''");

        let query =
            member_iteration_query("x@example.com", "Sprint 1' OR [System.Id] > '0").unwrap();
        assert!(query.contains("[System.IterationPath] = 'Sprint 1'' OR [System.Id] > ''0'"));
    }

    #[test]
    fn test_control_characters_refused() {
        let err = member_iteration_query("x@example.com\r\n", "Sprint 1").unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest { .. }));
    }
}
