#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use crate::catalog::{Catalog, LoadError};
    use crate::models::{VoteCount, VoteRequest};
    use crate::tally::{percent, TallyCache, TallyError};
    use crate::user_info::UserKey;
    use crate::validation::{is_valid_user_key, validate_vote_request, ValidationError, MAX_ID_LENGTH};
    use crate::error::ErrorCode;

    const CATALOG: &str = r#"{
        "categories": [
            {
                "id": "best_track",
                "title": "Best Track",
                "nominees": [
                    { "id": "a", "name": "Track A", "audio": "/static/audio/a.mp3" },
                    { "id": "b", "name": "Track B" }
                ]
            },
            {
                "id": "best_cover",
                "title": "Best Cover",
                "nominees": [
                    { "id": "x", "name": "Cover X", "image": "/static/img/x.png" },
                    { "id": "y", "name": "Cover Y" },
                    { "id": "z", "name": "Cover Z" }
                ]
            }
        ]
    }"#;

    fn catalog() -> Catalog {
        Catalog::from_json(CATALOG).unwrap()
    }

    fn request(category_id: &str, nominee_id: &str) -> VoteRequest {
        VoteRequest { category_id: category_id.into(), nominee_id: nominee_id.into() }
    }

    #[test]
    fn test_catalog_lookups() {
        let c = catalog();
        assert_eq!(c.categories().len(), 2);
        assert_eq!(c.nominee_count(), 5);

        let track = c.find_category("best_track").unwrap();
        assert_eq!(track.title, "Best Track");
        assert!(Catalog::nominee_exists(track, "a"));
        assert!(!Catalog::nominee_exists(track, "x"));
        assert_eq!(track.nominee("a").unwrap().audio.as_deref(), Some("/static/audio/a.mp3"));
        assert!(track.nominee("b").unwrap().image.is_none());

        assert!(c.find_category("best_album").is_none());
    }

    #[test]
    fn test_catalog_keeps_declaration_order() {
        let c = catalog();
        let ids: Vec<_> = c.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["best_track", "best_cover"]);
    }

    #[test]
    fn test_catalog_rejects_bad_documents() {
        assert!(matches!(Catalog::from_json("{ not json"), Err(LoadError::Malformed(_))));
        assert!(matches!(Catalog::from_json(r#"{"categories": 3}"#), Err(LoadError::Malformed(_))));

        let duplicate_category = r#"{"categories": [
            {"id": "c", "title": "One", "nominees": []},
            {"id": "c", "title": "Two", "nominees": []}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(duplicate_category),
            Err(LoadError::DuplicateCategory(id)) if id == "c"
        ));

        let duplicate_nominee = r#"{"categories": [
            {"id": "c", "title": "One", "nominees": [
                {"id": "n", "name": "N"}, {"id": "n", "name": "N again"}
            ]}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(duplicate_nominee),
            Err(LoadError::DuplicateNominee { .. })
        ));

        let empty_id = r#"{"categories": [{"id": " ", "title": "Blank", "nominees": []}]}"#;
        assert!(matches!(Catalog::from_json(empty_id), Err(LoadError::EmptyId(_))));
    }

    #[test]
    fn test_catalog_ids_fit_vote_requests() {
        let document = |category: &str, nominee: &str| {
            format!(
                r#"{{"categories": [{{"id": "{}", "title": "T", "nominees": [{{"id": "{}", "name": "N"}}]}}]}}"#,
                category, nominee
            )
        };
        let longest = "c".repeat(MAX_ID_LENGTH);
        let too_long = "c".repeat(MAX_ID_LENGTH + 6);

        let loaded = Catalog::from_json(&document(&longest, &longest)).unwrap();
        let category = loaded.find_category(&longest).unwrap();
        assert!(Catalog::nominee_exists(category, &longest));
        assert!(validate_vote_request(&request(&longest, &longest)).is_ok());

        assert!(matches!(
            Catalog::from_json(&document(&too_long, "n")),
            Err(LoadError::IdTooLong(_))
        ));
        assert!(matches!(
            Catalog::from_json(&document("c", &too_long)),
            Err(LoadError::IdTooLong(_))
        ));
    }

    #[test]
    fn test_catalog_load_missing_file() {
        let result = Catalog::load("definitely/not/here/categories.json");
        assert!(matches!(result, Err(LoadError::Unreadable { .. })));
    }

    #[test]
    fn test_catalog_load_from_disk() {
        let path = std::env::temp_dir().join(format!("catalog_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, CATALOG).unwrap();
        let loaded = Catalog::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, catalog());
    }

    #[test]
    fn test_new_tally_reports_every_nominee() {
        let tally = TallyCache::new(&catalog());
        let snapshot = tally.snapshot();
        assert_eq!(snapshot.len(), 2);

        let cover = &snapshot[1];
        assert_eq!(cover.category_id, "best_cover");
        let ids: Vec<_> = cover.nominees.iter().map(|n| n.nominee_id.as_str()).collect();
        assert_eq!(ids, ["x", "y", "z"]);
        assert!(snapshot.iter().flat_map(|c| &c.nominees).all(|n| n.votes == 0 && n.percent == 0));
    }

    #[test]
    fn test_tally_scenario() {
        let tally = TallyCache::new(&catalog());
        tally.increment("best_track", "a").unwrap();
        assert_eq!(tally.count("best_track", "a"), Some(1));
        tally.increment("best_track", "b").unwrap();

        let track = tally.snapshot().into_iter().next().unwrap();
        assert_eq!(track.total(), 2);
        assert_eq!(track.votes_for("a"), Some(1));
        assert!(track.nominees.iter().all(|n| n.percent == 50));
    }

    #[test]
    fn test_percent_rounds_down() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 66);
        assert_eq!(percent(3, 3), 100);

        let tally = TallyCache::new(&catalog());
        for nominee in ["x", "y", "z"] {
            tally.increment("best_cover", nominee).unwrap();
        }
        let cover = &tally.snapshot()[1];
        let sum: u32 = cover.nominees.iter().map(|n| u32::from(n.percent)).sum();
        assert_eq!(sum, 99);
    }

    #[test]
    fn test_increment_unknown_target() {
        let tally = TallyCache::new(&catalog());
        assert_eq!(
            tally.increment("best_track", "x"),
            Err(TallyError::UnknownTarget { category_id: "best_track".into(), nominee_id: "x".into() })
        );
        assert!(tally.increment("nope", "a").is_err());
        assert_eq!(tally.snapshot()[0].total(), 0);
    }

    #[test]
    fn test_restore_from_ledger_counts() {
        let tally = TallyCache::new(&catalog());
        tally.increment("best_cover", "z").unwrap();

        let rows = vec![
            VoteCount { category_id: "best_track".into(), nominee_id: "a".into(), votes: 4 },
            VoteCount { category_id: "best_track".into(), nominee_id: "b".into(), votes: 1 },
            VoteCount { category_id: "retired".into(), nominee_id: "old".into(), votes: 7 },
        ];
        assert_eq!(tally.restore(&rows), 1);

        let snapshot = tally.snapshot();
        assert_eq!(snapshot[0].votes_for("a"), Some(4));
        assert_eq!(snapshot[0].nominees[0].percent, 80);
        assert_eq!(snapshot[0].nominees[1].percent, 20);
        assert_eq!(snapshot[1].total(), 0);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let tally = Arc::new(TallyCache::new(&catalog()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let tally = Arc::clone(&tally);
                thread::spawn(move || {
                    let nominee = if i % 2 == 0 { "a" } else { "b" };
                    for _ in 0..500 {
                        tally.increment("best_track", nominee).unwrap();
                        let total = tally.snapshot()[0].total();
                        assert!(total <= 4000);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let track = &tally.snapshot()[0];
        assert_eq!(track.total(), 4000);
        assert_eq!(track.votes_for("a"), Some(2000));
    }

    #[test]
    fn test_vote_request_validation() {
        assert!(validate_vote_request(&request("best_track", "a")).is_ok());
        assert_eq!(validate_vote_request(&request("", "a")), Err(ValidationError::EmptyCategory));
        assert_eq!(validate_vote_request(&request("best_track", "  ")), Err(ValidationError::EmptyNominee));

        let long = "x".repeat(MAX_ID_LENGTH + 1);
        let err = validate_vote_request(&request(&long, "a")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCategory);
        let err = validate_vote_request(&request("best_track", &long)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidNominee);
    }

    #[test]
    fn test_user_keys() {
        let anon = UserKey::anonymous();
        assert!(anon.is_anonymous());
        assert_eq!(anon.as_str().len(), "anon_".len() + 32);
        assert!(is_valid_user_key(anon.as_str()));
        assert_ne!(anon, UserKey::anonymous());

        let tg = UserKey::telegram("123456");
        assert_eq!(tg.as_str(), "tg_123456");
        assert!(!tg.is_anonymous());

        assert!(!is_valid_user_key(""));
        assert!(!is_valid_user_key("anon_1; drop"));
        assert!(!is_valid_user_key(&"a".repeat(200)));
    }
}
