//! Catalog completeness and per-guard encoding.

mod common;

use common::{object, sample_input, SYSTEM_PROGRAM, TOKEN_PROGRAM};
use mintguard_core::error::{CoercionError, GuardError};
use mintguard_core::guards::{BotTax, Gatekeeper, Guard, GuardKind, MintLimit, SolPayment};
use mintguard_core::registry::{self, catalog, encode, fields_for, unknown_fields, verify_catalog};
use mintguard_core::types::{PublicKey, UnsignedInt};
use serde_json::json;

#[test]
fn test_catalog_is_consistent() {
    verify_catalog().unwrap();
    assert_eq!(catalog().len(), GuardKind::ALL.len());
    assert!(GuardKind::ALL.len() <= 64, "kinds must fit the feature mask");
}

#[test]
fn test_every_kind_has_fields_and_encodes() {
    for def in catalog() {
        let kind = def.kind.as_str();
        let fields = fields_for(kind).unwrap();
        assert!(!fields.is_empty(), "{} has no fields", kind);

        let guard = encode(kind, &sample_input(fields))
            .unwrap_or_else(|e| panic!("{} failed to encode: {}", kind, e));
        assert_eq!(guard.kind(), def.kind);
        assert_eq!(guard.field_values().len(), fields.len());
    }
}

#[test]
fn test_unknown_kind_rejected() {
    for kind in ["solPaymentt", "", "SolPayment", "candyMachine"] {
        match fields_for(kind).unwrap_err() {
            GuardError::UnknownGuardKind { kind: k } => assert_eq!(k, kind),
            other => panic!("Expected UnknownGuardKind, got {:?}", other),
        }
        assert!(matches!(
            encode(kind, &object(json!({}))),
            Err(GuardError::UnknownGuardKind { .. })
        ));
    }
}

#[test]
fn test_missing_required_field_named() {
    for def in catalog() {
        for field in def.fields.iter().filter(|f| f.required) {
            let mut raw = sample_input(def.fields);
            raw.remove(field.name);
            match encode(def.kind.as_str(), &raw).unwrap_err() {
                GuardError::MissingRequiredField { kind, field: f } => {
                    assert_eq!(kind, def.kind.as_str());
                    assert_eq!(f, field.name);
                }
                other => panic!("Expected MissingRequiredField, got {:?}", other),
            }
        }
    }
}

#[test]
fn test_null_field_counts_as_missing() {
    let raw = object(json!({ "lamports": null, "destination": SYSTEM_PROGRAM }));
    let err = encode("solPayment", &raw).unwrap_err();
    assert_eq!(
        err,
        GuardError::MissingRequiredField {
            kind: "solPayment".to_string(),
            field: "lamports".to_string(),
        }
    );
}

#[test]
fn test_sol_payment_encodes() {
    let raw = object(json!({ "lamports": 1_000_000, "destination": SYSTEM_PROGRAM }));
    let guard = encode("solPayment", &raw).unwrap();
    assert_eq!(
        guard,
        Guard::SolPayment(SolPayment {
            lamports: UnsignedInt::from(1_000_000),
            destination: PublicKey::new([0u8; 32]),
        })
    );
}

#[test]
fn test_unknown_fields_are_ignored() {
    let raw = object(json!({
        "id": 2,
        "limit": 10,
        "note": "added by a newer tool",
        "limti": 99,
    }));
    let guard = encode("mintLimit", &raw).unwrap();
    assert_eq!(
        guard,
        Guard::MintLimit(MintLimit {
            id: UnsignedInt::from(2),
            limit: UnsignedInt::from(10),
        })
    );
    assert_eq!(unknown_fields("mintLimit", &raw).unwrap(), vec!["note", "limti"]);
}

#[test]
fn test_invalid_field_carries_kind_field_and_reason() {
    let raw = object(json!({ "mint": "not-a-key", "amount": 5 }));
    let err = encode("tokenGate", &raw).unwrap_err();
    assert_eq!(err.kind(), "tokenGate");
    assert_eq!(err.field(), Some("mint"));
    match err {
        GuardError::InvalidField { source: CoercionError::InvalidPublicKey { value, .. }, .. } => {
            assert_eq!(value, "not-a-key");
        }
        other => panic!("Expected InvalidPublicKey, got {:?}", other),
    }
}

#[test]
fn test_first_bad_field_aborts_whole_guard() {
    // amount is fine, mint is bad, destinationAta is missing: the declared
    // field order decides which failure is reported.
    let raw = object(json!({ "amount": 5, "mint": 7 }));
    let err = encode("tokenPayment", &raw).unwrap_err();
    assert_eq!(err.field(), Some("mint"));
}

#[test]
fn test_optional_fields_take_defaults() {
    let raw = object(json!({ "lamports": 10_000_000 }));
    match encode("botTax", &raw).unwrap() {
        Guard::BotTax(BotTax { lamports, last_instruction }) => {
            assert!(last_instruction);
            assert_eq!(lamports.lamports, UnsignedInt::from(10_000_000));
            assert_eq!(lamports.sol, "0.01");
        }
        other => panic!("Expected BotTax, got {:?}", other),
    }

    let raw = object(json!({ "gatekeeperNetwork": TOKEN_PROGRAM }));
    match encode("gatekeeper", &raw).unwrap() {
        Guard::Gatekeeper(Gatekeeper { expire_on_use, .. }) => assert!(!expire_on_use),
        other => panic!("Expected Gatekeeper, got {:?}", other),
    }

    let spec = fields_for("botTax").unwrap();
    assert!(spec[0].required);
    assert!(!spec[1].required);
}

#[test]
fn test_compound_id_kept_verbatim() {
    for kind in ["mintLimit", "allocation", "nftMintLimit", "assetMintLimit"] {
        let mut raw = common::sample_input(fields_for(kind).unwrap());
        raw.insert("id".to_string(), json!(7));
        let guard = encode(kind, &raw).unwrap();
        let values = guard.field_values();
        assert_eq!(values[0].to_string(), "7", "{} id changed", kind);
    }
}

#[test]
fn test_kind_parse_round_trip() {
    for kind in GuardKind::ALL {
        assert_eq!(kind.as_str().parse::<GuardKind>().unwrap(), *kind);
        assert_eq!(registry::definition(kind.as_str()).unwrap().kind, *kind);
    }
}

#[test]
fn test_catalog_follows_on_chain_guard_set_order() {
    let expected = [
        "botTax", "solPayment", "tokenPayment", "startDate", "thirdPartySigner", "tokenGate",
        "gatekeeper", "endDate", "allowList", "mintLimit", "nftPayment", "redeemedAmount",
        "addressGate", "nftGate", "nftBurn", "tokenBurn", "freezeSolPayment", "freezeTokenPayment",
        "programGate", "allocation", "token2022Payment", "solFixedFee", "nftMintLimit", "edition",
        "assetPayment", "assetBurn", "assetMintLimit", "assetBurnMulti", "assetPaymentMulti",
        "assetGate", "vanityMint",
    ];
    let actual: Vec<&str> = catalog().iter().map(|def| def.kind.as_str()).collect();
    assert_eq!(actual, expected);
    assert_eq!(GuardKind::BotTax.index(), 0);
    assert_eq!(GuardKind::SolPayment.index(), 1);
    assert_eq!(GuardKind::VanityMint.index(), 30);
}
