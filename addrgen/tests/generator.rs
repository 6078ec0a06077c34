//! Tests for the address generator

use addrgen::{
    AddressGenerator, AddressRecord, Error, GeneratorConfig, MnemonicError, Network, PathTemplate,
    ScriptType,
};

const MOTOR: &str = "motor venture dilemma quote subject magnet keep large dry gossip bean paper";
const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn first_for<'a>(records: &'a [AddressRecord], path: &str, script_type: ScriptType) -> &'a AddressRecord {
    records
        .iter()
        .find(|r| r.path == path && r.script_type == script_type)
        .unwrap()
}

#[test]
fn test_default_config_reference_records() {
    init_tracing();
    let generator = AddressGenerator::new(GeneratorConfig::default()).unwrap();
    let records = generator.generate(1, MOTOR).unwrap();

    assert_eq!(records.len(), 60);
    assert!(records.iter().all(|r| r.seed_index == 1));

    let record = first_for(&records, "m/0'/0'/0'", ScriptType::P2pkh);
    assert_eq!(record.address, "1GyNWR7LPXdLSHeN4nE4b9P3gNEcjZkmzd");
    assert_eq!(
        record.private_key,
        "402b878469fdc3574114070c4c3e3b80bba959157b8f26449290453cdda18f9d"
    );
    assert_eq!(record.wif, "KyNSzr7jYueYWvsg4cKhwQEmrXCwYmkVAc4qpUX3NU6AqqyNSK7X");

    let record = first_for(&records, "m/44'/0'/0'/0/0'", ScriptType::P2pkh);
    assert_eq!(record.address, "1Jo3qrSUxWYYJdhDawJ58QU7wtyVtqAK5A");
    assert_eq!(
        record.public_key,
        "0289b86dfa13ad977c57c1a36d94a43b9abe6a62f240e9172556a5ab613208d259"
    );
    assert_eq!(record.wif, "L1zvhGE4WoJ1ds17ku9StUqP3x2PH15CUY26DnMgZuMi4jWhoG1w");

    let record = first_for(&records, "m/49'/0'/0'/0/0'", ScriptType::P2wpkhInP2sh);
    assert_eq!(record.address, "33ML21FE9QSqh9wizdQbZsHfE41vwkRT78");

    let record = first_for(&records, "m/84'/0'/0'/0/0'", ScriptType::P2wpkh);
    assert_eq!(record.address, "bc1qnc9umhdc04u0u5qfg0qu3aj75wvfps4z4sj7g6");

    let record = first_for(&records, "m/0/0'", ScriptType::P2wpkh);
    assert_eq!(record.address, "bc1qe59ssevhzy9v76syff0508ml97xm0rstcfdw0y");
    assert_eq!(record.wif, "L3V5wXPbC7VmDyh53LUPmYa28yRPz3Vu9Qwmkm6wcU3n8x8aRtDd");
}

#[test]
fn test_last_index_of_default_templates() {
    let generator = AddressGenerator::new(GeneratorConfig::default()).unwrap();
    let records = generator.generate(1, MOTOR).unwrap();

    let record = first_for(&records, "m/0'/0'/9'", ScriptType::P2pkh);
    assert_eq!(record.address_index, 9);
    assert_eq!(record.address, "1PqczvHBsYGu7T43iGGZUf9rS5f2WJeZLM");
    assert_eq!(record.wif, "Kws61W4f3XvDya3LDz5wkbJm1RExiFZ5t2HxmLNTogdnCD34fBJx");

    let record = first_for(&records, "m/84'/0'/0'/0/9'", ScriptType::P2wpkh);
    assert_eq!(record.address, "bc1qv2phd99xwr6z2d6ujc48pdvulsdtaed0llvwek");
}

#[test]
fn test_passphrase_and_whitespace() {
    let config = GeneratorConfig {
        passphrase: "TREZOR".to_string(),
        addresses_per_path: 1,
        paths: vec![PathTemplate::new("m/44'/0'/0'/0", vec![ScriptType::P2pkh], true)],
        ..GeneratorConfig::default()
    };
    let generator = AddressGenerator::new(config).unwrap();

    let spaced = format!("  {}\n", MOTOR.replace(' ', "\t "));
    let records = generator.generate(1, &spaced).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, "1EPoUKguw3DZSgcEyDhSFxLR63XhC1JoNG");
}

#[test]
fn test_testnet_non_hardened_template() {
    let config = GeneratorConfig {
        addresses_per_path: 1,
        network: Network::Testnet,
        paths: vec![PathTemplate::new("m/84'/1'/0'/0", vec![ScriptType::P2wpkh], false)],
        ..GeneratorConfig::default()
    };
    let records = AddressGenerator::new(config).unwrap().generate(7, ABANDON).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].seed_index, 7);
    assert_eq!(records[0].path, "m/84'/1'/0'/0/0");
    assert_eq!(records[0].address, "tb1q6rz28mcfaxtmd6v789l9rrlrusdprr9pqcpvkl");
}

#[test]
fn test_start_index() {
    let config = GeneratorConfig {
        start_index: 9,
        addresses_per_path: 1,
        paths: vec![PathTemplate::new("m/0'/0'", vec![ScriptType::P2pkh], true)],
        ..GeneratorConfig::default()
    };
    let records = AddressGenerator::new(config).unwrap().generate(1, MOTOR).unwrap();

    assert_eq!(records[0].path, "m/0'/0'/9'");
    assert_eq!(records[0].address, "1PqczvHBsYGu7T43iGGZUf9rS5f2WJeZLM");
}

#[test]
fn test_batch_continues_past_invalid_input() {
    init_tracing();
    let config = GeneratorConfig {
        addresses_per_path: 1,
        ..GeneratorConfig::default()
    };
    let generator = AddressGenerator::new(config).unwrap();

    let invalid_checksum = MOTOR.replace("paper", "zoo");
    let outcomes = generator.generate_batch(vec![
        MOTOR.to_string(),
        "motor venture dilemma".to_string(),
        invalid_checksum,
        "motor venture dilemma quote subject magnet keep large dry gossip bean notaword".to_string(),
        ABANDON.to_string(),
    ]);

    assert_eq!(outcomes.len(), 5);
    let indices: Vec<usize> = outcomes.iter().map(|o| o.seed_index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5]);

    assert_eq!(outcomes[0].result.as_ref().unwrap().len(), 6);
    assert_eq!(
        outcomes[1].result.as_ref().unwrap_err(),
        &Error::InvalidMnemonic(MnemonicError::BadWordCount(3))
    );
    assert_eq!(
        outcomes[2].result.as_ref().unwrap_err(),
        &Error::InvalidMnemonic(MnemonicError::ChecksumMismatch)
    );
    assert!(matches!(
        outcomes[3].result,
        Err(Error::InvalidMnemonic(MnemonicError::UnknownWord(_)))
    ));

    let last = outcomes[4].result.as_ref().unwrap();
    assert!(last.iter().all(|r| r.seed_index == 5));
}

#[test]
fn test_generator_is_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AddressGenerator<'static>>();

    let generator = AddressGenerator::new(GeneratorConfig {
        addresses_per_path: 1,
        ..GeneratorConfig::default()
    })
    .unwrap();
    let expected = generator.generate(1, MOTOR).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| generator.generate(1, MOTOR).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_records_serialize_to_json() {
    let generator = AddressGenerator::new(GeneratorConfig {
        addresses_per_path: 1,
        paths: vec![PathTemplate::new("m/0", vec![ScriptType::P2wpkhInP2sh, ScriptType::P2wpkh], true)],
        ..GeneratorConfig::default()
    })
    .unwrap();
    let records = generator.generate(1, MOTOR).unwrap();

    let json = serde_json::to_string(&records).unwrap();
    let back: Vec<AddressRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, records);
    assert!(json.contains("\"script_type\":\"P2WPKH nested in P2SH\""));
    assert!(json.contains("3HWZMAtc7MyENWguyhWaLrLjXpWTMpfZLh"));
}
