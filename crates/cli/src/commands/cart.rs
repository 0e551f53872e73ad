//! Cart commands. Mutations go through the session coordinator, so a
//! server rejection shows up as the same notice the UI would render.

use clap::Subcommand;

use ecom_market_core::ProductId;
use ecom_market_storefront::session::{CartSnapshot, StoreSession};

use super::{CliError, print_notices, rejection};

/// Cart subcommands.
#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        /// Product ID
        product_id: i32,
        /// Quantity to add
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity
    Set {
        /// Product ID
        product_id: i32,
        /// New quantity (>= 1)
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Product ID
        product_id: i32,
    },
    /// Remove every line
    Clear,
}

/// Run a cart subcommand.
///
/// # Errors
///
/// Returns an error if a fetch fails or a mutation is rolled back.
pub async fn run(session: &StoreSession, action: CartAction) -> Result<(), CliError> {
    session.load_cart().await?;

    match action {
        CartAction::Show => {}
        CartAction::Add {
            product_id,
            quantity,
        } => {
            // The coordinator needs the denormalized product snapshot the
            // listing would have supplied.
            let product = session.api().product(ProductId::new(product_id)).await?;
            if !session.add_to_cart(&product.summary(), quantity).await {
                print_notices(session);
                return Err(rejection(session, "add to cart failed"));
            }
        }
        CartAction::Set {
            product_id,
            quantity,
        } => {
            if !session.set_quantity(ProductId::new(product_id), quantity).await {
                print_notices(session);
                return Err(rejection(session, "quantity update failed"));
            }
        }
        CartAction::Remove { product_id } => {
            if !session.remove_item(ProductId::new(product_id)).await {
                print_notices(session);
                return Err(rejection(session, "remove failed"));
            }
        }
        CartAction::Clear => {
            if !session.clear_cart().await {
                print_notices(session);
                return Err(rejection(session, "clear failed"));
            }
        }
    }

    print_cart(&session.cart());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &CartSnapshot) {
    if cart.is_empty() {
        println!("(корзина пуста)");
        return;
    }
    for item in cart.items() {
        println!(
            "{:>6}  {:<48} {:>3} x {:>14} = {}",
            item.product.id,
            item.product.name,
            item.quantity,
            item.price_at_addition.to_string(),
            item.subtotal()
        );
    }
    println!(
        "итого: {} товаров на {}",
        cart.total_quantity(),
        cart.total_price()
    );
}
