//! lobcore demo driver.
//!
//! Builds a two-sided book, registers a printing trade callback, then runs
//! an aggressive limit sweep and a market sell, printing depth after each
//! step.

use lobcore::types::price::{from_f64, from_fixed};
use lobcore::{OrderBook, OrderType, Side};

fn print_book(book: &OrderBook) {
    println!("\n=== Order Book ===");

    let asks = book.ask_depth(5);
    for (price, quantity) in asks.iter().rev() {
        println!("  ASK {:>10}  |  {}", from_fixed(*price), quantity);
    }

    println!("  --------------------");

    for (price, quantity) in book.bid_depth(5) {
        println!("  BID {:>10}  |  {}", from_fixed(price), quantity);
    }

    println!("  Spread: {}", from_fixed(book.spread()));
    println!(
        "  Orders: {}  Trades: {}  Volume: {}",
        book.total_orders(),
        book.total_trades(),
        book.total_volume()
    );
}

fn main() {
    let mut book = OrderBook::with_capacity(100_000);

    book.set_trade_callback(|trade| {
        println!(
            "[TRADE] Price={} Qty={} Buy#{} Sell#{}",
            from_fixed(trade.price),
            trade.quantity,
            trade.buy_order_id,
            trade.sell_order_id
        );
    });

    println!("--- Adding resting orders ---");
    book.submit(Side::Buy, OrderType::Limit, from_f64(99.00), 500).unwrap();
    book.submit(Side::Buy, OrderType::Limit, from_f64(99.50), 300).unwrap();
    book.submit(Side::Buy, OrderType::Limit, from_f64(100.00), 200).unwrap();

    book.submit(Side::Sell, OrderType::Limit, from_f64(100.50), 150).unwrap();
    book.submit(Side::Sell, OrderType::Limit, from_f64(101.00), 400).unwrap();
    book.submit(Side::Sell, OrderType::Limit, from_f64(101.50), 250).unwrap();

    print_book(&book);

    println!("\n--- Aggressive buy: 200 @ 101.00 ---");
    let result = book
        .submit(Side::Buy, OrderType::Limit, from_f64(101.00), 200)
        .unwrap();
    println!(
        "Filled: {}  Remaining: {}  Trades: {}",
        result.filled_quantity,
        result.remaining_quantity,
        result.trades.len()
    );

    print_book(&book);

    println!("\n--- Market sell: 400 ---");
    let result = book.submit(Side::Sell, OrderType::Market, 0, 400).unwrap();
    println!(
        "Filled: {}  Remaining: {}  Status: {:?}",
        result.filled_quantity, result.remaining_quantity, result.status
    );

    print_book(&book);
}
