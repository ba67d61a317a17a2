//! Tests for role wallet derivation

use deploykit::account::{derive_wallet, derive_wallets, HdWallet, Role};
use deploykit::{Error, Seed};

#[test]
fn test_three_role_wallets_are_distinct_and_reproducible() {
    let seed = Seed::new("test-seed-A").unwrap();

    let first = derive_wallets(&seed, &[0, 1, 2]).unwrap();
    let second = derive_wallets(&Seed::new("test-seed-A").unwrap(), &[0, 1, 2]).unwrap();

    assert_eq!(first, second);
    assert_ne!(first[0].address, first[1].address);
    assert_ne!(first[1].address, first[2].address);
    assert_ne!(first[0].address, first[2].address);

    let addresses: Vec<String> = first.iter().map(|w| w.address.to_string()).collect();
    assert_eq!(
        addresses,
        vec![
            "0x59067aa6e879D7f9464C64FE704c8717B7558B9B",
            "0x165cAF1CC790c1BFE16728699Dd7E66B3469531D",
            "0x18de9263daE6AB130562dbe5371F5137eD425Efd",
        ]
    );
}

#[test]
fn test_wallet_fields() {
    let seed = Seed::new("test-seed-A").unwrap();
    let wallet = derive_wallet(&seed, 2).unwrap();

    assert_eq!(wallet.index, 2);
    assert_eq!(wallet.path.to_string(), "m/44'/60'/0'/0/2");
    assert_eq!(wallet.role(), Some(Role::Executor));
    assert_eq!(wallet.public_key.compressed().len(), 33);
    assert!(wallet.public_key.to_hex().starts_with("0x02") || wallet.public_key.to_hex().starts_with("0x03"));
    assert_eq!(wallet.private_key.expose_hex().len(), 66);
}

#[test]
fn test_distinct_indices_never_collide() {
    let seed = Seed::new("abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about").unwrap();
    let wallets = derive_wallets(&seed, &(0..16u32).collect::<Vec<_>>()).unwrap();

    for (i, a) in wallets.iter().enumerate() {
        for b in &wallets[i + 1..] {
            assert_ne!(a.address, b.address);
            assert_ne!(a.private_key, b.private_key);
        }
    }
}

#[test]
fn test_different_seeds_give_different_wallets() {
    let a = derive_wallet(&Seed::new("test-seed-A").unwrap(), 0).unwrap();
    let b = derive_wallet(&Seed::new("test-seed-B").unwrap(), 0).unwrap();

    assert_ne!(a.address, b.address);
}

#[test]
fn test_empty_seed_fails_fast() {
    assert!(matches!(Seed::new(""), Err(Error::InvalidSeed(_))));
}

#[test]
fn test_derive_role() {
    let seed = Seed::new("test-seed-A").unwrap();
    let hd = HdWallet::from_seed(&seed);

    assert_eq!(hd.derive_role(Role::Admin).unwrap(), hd.derive(1).unwrap());
}

#[test]
fn test_concurrent_derivation_matches_sequential() {
    let seed = Seed::new("test-seed-A").unwrap();
    let expected = derive_wallets(&seed, &[0, 1, 2]).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..3u32)
            .map(|index| {
                let seed = &seed;
                scope.spawn(move || derive_wallet(seed, index).unwrap())
            })
            .collect();

        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), expected);
        }
    });
}
