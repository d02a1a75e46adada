use crate::model::Assignment;
use crate::roster::LoginPool;
use crate::variants::{strip_mafile_extension, variants};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
}

impl From<MatchKind> for Assignment {
    fn from(kind: MatchKind) -> Self {
        match kind {
            MatchKind::Exact => Assignment::Exact,
            MatchKind::Substring => Assignment::Substring,
        }
    }
}

/// Pool index of the login picked for a maFile, and how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub kind: MatchKind,
}

/// Find the best available login for one maFile.
///
/// Priority cascade, first hit wins:
/// 1. any variant that is an available login (case-sensitive; which variant
///    wins when several do is unspecified),
/// 2. the first available login, in roster order, that contains or is
///    contained in the identifier or the filename stem, ignoring case.
///
/// Does not consume the login; the caller takes it from the pool.
pub fn find_best_match(identifier: &str, filename: &str, pool: &LoginPool<'_>) -> Option<Hit> {
    for variant in &variants(identifier, filename) {
        if let Some(index) = pool.lookup(variant) {
            return Some(Hit {
                index,
                kind: MatchKind::Exact,
            });
        }
    }

    let id = identifier.trim().to_lowercase();
    let stem = strip_mafile_extension(filename).trim().to_lowercase();

    pool.available()
        .find(|(_, entry)| {
            let login = entry.login.trim().to_lowercase();
            contains_either(&login, &id) || contains_either(&login, &stem)
        })
        .map(|(index, _)| Hit {
            index,
            kind: MatchKind::Substring,
        })
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{parse_text, Roster};

    fn login_of(pool: &LoginPool<'_>, hit: Option<Hit>) -> Option<(String, MatchKind)> {
        hit.map(|h| (pool.entry(h.index).login.clone(), h.kind))
    }

    fn roster(text: &str) -> Roster {
        parse_text(text)
    }

    #[test]
    fn exact_account_name() {
        let r = roster("alice:pw1\nbob:pw2\n");
        let pool = LoginPool::new(&r);
        let hit = find_best_match("bob", "whatever.maFile", &pool);
        assert_eq!(login_of(&pool, hit), Some(("bob".into(), MatchKind::Exact)));
    }

    #[test]
    fn exact_is_case_sensitive_substring_is_not() {
        let r = roster("Alice:pw1\n");
        let pool = LoginPool::new(&r);
        let hit = find_best_match("alice", "x.maFile", &pool);
        assert_eq!(login_of(&pool, hit), Some(("Alice".into(), MatchKind::Substring)));
    }

    #[test]
    fn steam64_tail() {
        let r = roster("someone:pw\n60287930:secret\n");
        let pool = LoginPool::new(&r);
        let hit = find_best_match("76561197960287930", "76561197960287930.maFile", &pool);
        assert_eq!(login_of(&pool, hit), Some(("60287930".into(), MatchKind::Exact)));
    }

    #[test]
    fn filename_part() {
        let r = roster("carol:pw\n");
        let pool = LoginPool::new(&r);
        let hit = find_best_match("76561198000000001", "acc_carol.maFile", &pool);
        assert_eq!(login_of(&pool, hit), Some(("carol".into(), MatchKind::Exact)));
    }

    #[test]
    fn substring_first_in_roster_order() {
        let r = roster("zed:1\nmax:2\nmaxi:3\n");
        let pool = LoginPool::new(&r);
        // "maximus" contains both "max" and "maxi"; roster order decides
        let hit = find_best_match("maximus", "x.maFile", &pool);
        assert_eq!(login_of(&pool, hit), Some(("max".into(), MatchKind::Substring)));
    }

    #[test]
    fn substring_identifier_inside_login() {
        let r = roster("dave_main_2024:pw\n");
        let pool = LoginPool::new(&r);
        let hit = find_best_match("DAVE", "y.maFile", &pool);
        assert_eq!(
            login_of(&pool, hit),
            Some(("dave_main_2024".into(), MatchKind::Substring))
        );
    }

    #[test]
    fn taken_logins_are_invisible() {
        let r = roster("alice:pw1\nalice2:pw2\n");
        let mut pool = LoginPool::new(&r);
        pool.take(0);
        let hit = find_best_match("alice", "alice.maFile", &pool);
        assert_eq!(login_of(&pool, hit), Some(("alice2".into(), MatchKind::Substring)));
    }

    #[test]
    fn no_match() {
        let r = roster("zed:1\n");
        let pool = LoginPool::new(&r);
        assert_eq!(find_best_match("alice", "alice.maFile", &pool), None);
    }

    #[test]
    fn empty_identifier_matches_first_login() {
        // an empty folded identifier is contained in every login
        let r = roster("first:1\nsecond:2\n");
        let pool = LoginPool::new(&r);
        let hit = find_best_match("", ".maFile", &pool);
        assert_eq!(login_of(&pool, hit), Some(("first".into(), MatchKind::Substring)));
    }
}
