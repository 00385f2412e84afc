use bulls_cows::codec::{self, CodecError, Payload};
use bulls_cows::{GameDefaultData, GamerData, MoveData, Operation, Request};
use chrono::NaiveDate;
use proptest::prelude::*;

#[test]
fn test_encode_scalar_payload() {
    let request = codec::encode(Operation::CreateGame, Payload::scalar(4)).unwrap();
    assert_eq!(request.request_type, "createGame");
    assert_eq!(request.request_data, "4");
}

#[test]
fn test_encode_compound_key() {
    let request = codec::encode(
        Operation::GamerJoinGame,
        Payload::compound(&[&7u64, &"bob"]),
    )
    .unwrap();
    assert_eq!(request.request_data, "7;bob");
}

#[test]
fn test_encode_empty_payload() {
    let request = codec::encode(Operation::GetAllGamers, Payload::Empty).unwrap();
    assert_eq!(request, Request::new(Operation::GetAllGamers, ""));
}

#[test]
fn test_encode_record_payload() {
    let gamer = GamerData {
        username: "alice".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2000, 2, 29).unwrap(),
    };
    let payload = Payload::record(&gamer).unwrap();
    let request = codec::encode(Operation::RegisterGamer, payload).unwrap();
    let value: serde_json::Value = serde_json::from_str(&request.request_data).unwrap();
    assert_eq!(value["username"], "alice");
    assert_eq!(value["birthDate"], "2000-02-29");
}

#[test]
fn test_encode_rejects_wrong_scheme() {
    let err = codec::encode(Operation::GameOver, Payload::Empty).unwrap_err();
    assert!(matches!(
        err,
        CodecError::SchemeMismatch {
            operation: Operation::GameOver,
            ..
        }
    ));

    // Compound arity is part of the scheme.
    let err = codec::encode(Operation::GamerJoinGame, Payload::compound(&[&7u64])).unwrap_err();
    assert!(matches!(err, CodecError::SchemeMismatch { .. }));
}

#[test]
fn test_every_operation_round_trips_its_name() {
    for op in Operation::ALL {
        assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
    }
    assert!("dropTables".parse::<Operation>().is_err());
}

#[test]
fn test_decode_scalars() {
    assert_eq!(codec::decode_scalar::<u64>("42").unwrap(), 42);
    assert_eq!(codec::decode_scalar::<u32>(" 7\n").unwrap(), 7);
    assert!(codec::decode_scalar::<bool>("true").unwrap());
    assert!(!codec::decode_scalar::<bool>("false").unwrap());
}

#[test]
fn test_decode_scalar_malformed() {
    let err = codec::decode_scalar::<u64>("seven").unwrap_err();
    match err {
        CodecError::Scalar { raw, kind } => {
            assert_eq!(raw, "seven");
            assert_eq!(kind, "u64");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(codec::decode_scalar::<bool>("yes").is_err());
}

#[test]
fn test_decode_list_single_token() {
    let ids: Vec<u64> = codec::decode_list("12", codec::decode_scalar).unwrap();
    assert_eq!(ids, vec![12]);
}

#[test]
fn test_decode_list_empty_string_is_one_empty_token() {
    let names: Vec<String> = codec::decode_list("", |t| Ok(t.to_string())).unwrap();
    assert_eq!(names, vec![String::new()]);

    // Numeric lists therefore fail on empty input instead of yielding no ids.
    assert!(codec::decode_list::<u64, _>("", codec::decode_scalar).is_err());
}

#[test]
fn test_decode_list_stops_on_bad_token() {
    let result: Result<Vec<u64>, _> = codec::decode_list("1;x;3", codec::decode_scalar);
    assert!(matches!(result, Err(CodecError::Scalar { .. })));
}

#[test]
fn test_decode_defaults_record() {
    let raw = r#"{"minSeqSize":4,"maxSeqSize":10,"defSeqSize":4,"minAge":16}"#;
    let defaults: GameDefaultData = codec::decode_record(raw).unwrap();
    assert_eq!(
        defaults,
        GameDefaultData {
            min_seq_len: 4,
            max_seq_len: 10,
            def_seq_len: 4,
            min_age: 16,
        }
    );
}

#[test]
fn test_decode_move_history() {
    let raw = r#"{"sequence":"1234","bulls":1,"cows":2};{"sequence":"5678","bulls":0,"cows":0}"#;
    let moves: Vec<MoveData> = codec::decode_list(raw, codec::decode_record).unwrap();
    assert_eq!(moves.len(), 2);
    assert_eq!(moves[0].sequence, "1234");
    assert_eq!((moves[0].bulls, moves[0].cows), (1, 2));
    assert_eq!(moves[1].sequence, "5678");
}

#[test]
fn test_decode_record_malformed() {
    let result: Result<GameDefaultData, _> = codec::decode_record(r#"{"minSeqSize":4}"#);
    assert!(matches!(result, Err(CodecError::Record(_))));
}

#[test]
fn test_decode_compound() {
    assert_eq!(codec::decode_compound("7;bob", 2).unwrap(), vec!["7", "bob"]);
    assert!(matches!(
        codec::decode_compound("7", 2),
        Err(CodecError::Arity { expected: 2, .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// N joined tokens decode to N elements, in order.
    #[test]
    fn decode_list_preserves_order(ids in prop::collection::vec(any::<u64>(), 1..20)) {
        let raw = codec::encode_list(&ids);
        let decoded: Vec<u64> = codec::decode_list(&raw, codec::decode_scalar).unwrap();
        prop_assert_eq!(decoded, ids);
    }
}
