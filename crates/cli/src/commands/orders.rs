//! Order history and checkout commands.

use clap::Subcommand;

use ecom_market_core::OrderId;
use ecom_market_storefront::api::types::{OrderDraft, OrderPayload};
use ecom_market_storefront::messages;
use ecom_market_storefront::session::StoreSession;

use super::{CliError, print_notices};

/// Order subcommands.
#[derive(Subcommand)]
pub enum OrdersAction {
    /// List orders
    List,
    /// Show one order
    Show {
        /// Order ID
        order_id: i32,
    },
    /// Create an order from the current cart
    Create {
        /// Customer first name
        #[arg(long)]
        first_name: String,
        /// Customer last name
        #[arg(long)]
        last_name: String,
        /// Delivery city
        #[arg(long)]
        city: String,
        /// Postal code
        #[arg(long)]
        postal_code: String,
        /// Street address
        #[arg(long)]
        address: String,
        /// Contact phone
        #[arg(long)]
        phone: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Delivery notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel an order
    Cancel {
        /// Order ID
        order_id: i32,
    },
}

/// Run an order subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn run(session: &StoreSession, action: OrdersAction) -> Result<(), CliError> {
    // Orders have no guest fallback: a signed-out user gets the distinct
    // sign-in prompt, not a generic error.
    if !session.auth().is_authenticated() {
        return Err(CliError::Rejected(messages::SIGN_IN_REQUIRED.to_owned()));
    }

    match action {
        OrdersAction::List => {
            let list = session.orders().await?;
            print_order_list(&list.orders, list.total);
        }
        OrdersAction::Show { order_id } => {
            let order = session.order(OrderId::new(order_id)).await?;
            print_order(&order);
        }
        OrdersAction::Create {
            first_name,
            last_name,
            city,
            postal_code,
            address,
            phone,
            email,
            notes,
        } => {
            let draft = OrderDraft {
                first_name,
                last_name,
                city,
                postal_code,
                address,
                phone,
                email,
                notes,
            };
            let created = match session.checkout(&draft).await {
                Ok(created) => created,
                Err(e) => {
                    print_notices(session);
                    return Err(e.into());
                }
            };
            print_created(&created.order_number, created.total_price.to_string().as_str());
        }
        OrdersAction::Cancel { order_id } => {
            let canceled = session.cancel_order(OrderId::new(order_id)).await?;
            print_line(&format!("заказ {} отменен", canceled.order_id));
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_order_list(
    orders: &[ecom_market_storefront::api::types::OrderSummaryPayload],
    total: u32,
) {
    for order in orders {
        println!(
            "{:>6}  {:<12} {:<10} {:>3} шт. {:>14}  {}",
            order.id,
            order.order_number,
            order.status.to_string(),
            order.total_items,
            order.total_price.to_string(),
            order.created_at
        );
    }
    println!("всего заказов: {total}");
}

#[allow(clippy::print_stdout)]
fn print_order(order: &OrderPayload) {
    println!("{} ({}) — {}", order.order_number, order.id, order.status);
    for item in &order.items {
        println!(
            "  {:<48} {:>3} x {:>14}",
            item.product_name,
            item.quantity,
            item.price_at_purchase.to_string()
        );
    }
    println!("итого: {} товаров на {}", order.total_items, order.total_price);
}

#[allow(clippy::print_stdout)]
fn print_created(order_number: &str, total: &str) {
    println!("заказ {order_number} оформлен на {total}");
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}
