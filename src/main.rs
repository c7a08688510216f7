//! lobcore - demo binary
//!
//! Seeds a small book, crosses an order through it, and prints the
//! resulting fills.

use lobcore::types::price::{from_fixed, from_fixed_trimmed, to_fixed};
use lobcore::{OrderBook, Side};

fn main() {
    let mut book = OrderBook::with_capacity(1024);

    println!("Seeding resting liquidity...");
    for (id, side, price, volume) in [
        (1, Side::Bid, "99.50", 10),
        (2, Side::Bid, "100.00", 5),
        (3, Side::Ask, "100.50", 5),
        (4, Side::Ask, "101.00", 10),
    ] {
        book.insert(id, side, to_fixed(price).expect("valid price"), volume)
            .expect("fresh id");
        println!("  #{} {:?} {} x {}", id, side, price, volume);
    }

    println!();
    println!(
        "Best bid {}  |  best ask {}",
        from_fixed(book.best_bid().unwrap()),
        from_fixed(book.best_ask().unwrap()),
    );

    println!();
    println!("Incoming bid #5: 12 @ 101.00 ...");
    let trades = book
        .insert(5, Side::Bid, to_fixed("101.00").unwrap(), 12)
        .expect("fresh id");

    for trade in &trades {
        println!(
            "  filled {} @ {} (maker #{}, taker #{})",
            trade.volume,
            from_fixed_trimmed(trade.price),
            trade.maker_order_id,
            trade.taker_order_id,
        );
    }

    println!();
    println!(
        "Book after the sweep: {} bid level(s), {} ask level(s), {} resting order(s)",
        book.bid_levels(),
        book.ask_levels(),
        book.order_count(),
    );
    println!("State digest: {}", hex::encode(book.state_digest()));
}
