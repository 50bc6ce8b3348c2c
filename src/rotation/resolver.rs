use super::date::parse_dated_name;
use crate::client::ServiceAccount;
use time::Date;

/// A service account whose name matched `<prefix>-<date>`. The name-derived
/// date drives ordering and keep/delete selection; `created_at` is carried
/// for age display only.
#[derive(Debug, Clone)]
pub struct RotationCandidate {
    pub id: String,
    pub name: String,
    pub parsed_date: Date,
    pub created_at: i64,
    pub role: Option<String>,
}

/// Pure resolver: filter a fetched account list down to the accounts that
/// match the naming pattern, newest first. Accounts with equal parsed dates
/// keep their fetch order (stable sort).
pub fn resolve_candidates(accounts: &[ServiceAccount], prefix: &str) -> Vec<RotationCandidate> {
    let mut matching: Vec<RotationCandidate> = accounts
        .iter()
        .filter_map(|account| {
            parse_dated_name(&account.name, prefix).map(|parsed_date| RotationCandidate {
                id: account.id.clone(),
                name: account.name.clone(),
                parsed_date,
                created_at: account.created_at,
                role: account.role.clone(),
            })
        })
        .collect();
    matching.sort_by(|a, b| b.parsed_date.cmp(&a.parsed_date));
    matching
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, name: &str, created_at: i64) -> ServiceAccount {
        ServiceAccount {
            id: id.to_string(),
            name: name.to_string(),
            role: Some("member".to_string()),
            created_at,
        }
    }

    #[test]
    fn non_matching_names_are_excluded() {
        let accounts = vec![
            account("sa_1", "billing-24-11", 100),
            account("sa_2", "billing", 200),
            account("sa_3", "billing-notadate", 300),
            account("sa_4", "other-24-11", 400),
        ];
        let candidates = resolve_candidates(&accounts, "billing");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "sa_1");
    }

    #[test]
    fn candidates_sort_newest_first() {
        let accounts = vec![
            account("sa_old", "svc-23-01", 10),
            account("sa_new", "svc-2024-11-13", 20),
            account("sa_mid", "svc-24-06", 30),
        ];
        let candidates = resolve_candidates(&accounts, "svc");
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["sa_new", "sa_mid", "sa_old"]);
    }

    #[test]
    fn equal_dates_keep_fetch_order() {
        let accounts = vec![
            account("sa_a", "svc-24-11", 1),
            account("sa_b", "svc-2024-11-01", 2),
            account("sa_c", "svc-24-11", 3),
        ];
        let candidates = resolve_candidates(&accounts, "svc");
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        // All three parse to 2024-11-01; input order is the tie-break.
        assert_eq!(ids, ["sa_a", "sa_b", "sa_c"]);
    }

    #[test]
    fn candidates_carry_creation_time_verbatim() {
        let accounts = vec![account("sa_1", "svc-24-11", 1_700_000_000)];
        let candidates = resolve_candidates(&accounts, "svc");
        assert_eq!(candidates[0].created_at, 1_700_000_000);
        assert_eq!(candidates[0].role.as_deref(), Some("member"));
    }
}
