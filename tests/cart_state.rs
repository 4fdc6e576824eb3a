use std::collections::HashMap;

use farmgate_api::cart::Cart;
use uuid::Uuid;

#[test]
fn add_creates_entry_at_one_and_accumulates() {
    let a = Uuid::new_v4();
    let mut cart = Cart::new();

    cart.add(a);
    assert_eq!(cart.quantity(a), 1);

    cart.add(a);
    cart.add(a);
    assert_eq!(cart.quantity(a), 3);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total_items(), 3);
}

#[test]
fn remove_decrements_and_deletes_at_zero() {
    let a = Uuid::new_v4();
    let mut cart = Cart::new();
    cart.add(a);
    cart.add(a);

    cart.remove(a);
    assert_eq!(cart.quantity(a), 1);

    cart.remove(a);
    assert_eq!(cart.quantity(a), 0);
    assert!(cart.is_empty());

    // Removing an absent entry is a no-op.
    cart.remove(a);
    assert!(cart.is_empty());
}

#[test]
fn set_quantity_is_absolute_and_zero_deletes() {
    let a = Uuid::new_v4();
    let mut cart = Cart::new();

    cart.set_quantity(a, 5);
    assert_eq!(cart.quantity(a), 5);

    cart.set_quantity(a, 2);
    assert_eq!(cart.quantity(a), 2);

    cart.set_quantity(a, 0);
    assert!(cart.is_empty());

    cart.set_quantity(a, -3);
    assert!(cart.is_empty());
}

#[test]
fn from_entries_drops_non_positive_quantities() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let c = Uuid::new_v4();

    let cart = Cart::from_entries(vec![(a, 2), (b, 0), (c, -1)]);
    assert_eq!(cart.quantity(a), 2);
    assert_eq!(cart.quantity(b), 0);
    assert_eq!(cart.quantity(c), 0);
    assert_eq!(cart.len(), 1);
}

#[test]
fn totals_follow_any_mutation_sequence() {
    let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let mut cart = Cart::new();

    // Deterministic pseudo-random walk over the three mutations.
    let mut seed: u64 = 0x5eed;
    for _ in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let id = ids[(seed >> 33) as usize % ids.len()];
        match seed % 3 {
            0 => cart.add(id),
            1 => cart.remove(id),
            _ => cart.set_quantity(id, ((seed >> 16) % 7) as i32 - 2),
        }

        let sum: i64 = cart.entries().map(|(_, q)| q as i64).sum();
        assert_eq!(cart.total_items(), sum);
        assert!(cart.entries().all(|(_, q)| q >= 1), "stored quantity below 1");
    }
}

#[test]
fn total_price_joins_against_given_prices() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let gone = Uuid::new_v4();

    let mut cart = Cart::new();
    cart.set_quantity(a, 2);
    cart.set_quantity(b, 1);
    cart.set_quantity(gone, 3);

    let mut prices = HashMap::new();
    prices.insert(a, 500);
    prices.insert(b, 1200);

    // Unknown products price at zero rather than failing the total.
    assert_eq!(cart.total_price(&prices), 2200);

    // Prices are not frozen in the cart: a catalog change shows up
    // immediately in the computed total.
    prices.insert(a, 600);
    assert_eq!(cart.total_price(&prices), 2400);
}
