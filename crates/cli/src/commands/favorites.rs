//! Favorites commands.

use clap::Subcommand;

use ecom_market_core::ProductId;
use ecom_market_storefront::session::{FavoritesSnapshot, StoreSession, ToggleOutcome};

use super::{CliError, print_notices, rejection};

/// Favorites subcommands.
#[derive(Subcommand)]
pub enum FavoritesAction {
    /// Show favorites
    Show,
    /// Flip a product's favorite membership
    Toggle {
        /// Product ID
        product_id: i32,
    },
}

/// Run a favorites subcommand.
///
/// # Errors
///
/// Returns an error if a fetch fails or the toggle is rolled back.
pub async fn run(session: &StoreSession, action: FavoritesAction) -> Result<(), CliError> {
    session.load_favorites().await?;

    match action {
        FavoritesAction::Show => {}
        FavoritesAction::Toggle { product_id } => {
            let product = session.api().product(ProductId::new(product_id)).await?;
            match session.toggle_favorite(&product.summary()).await {
                ToggleOutcome::Applied { is_favorite } => {
                    print_toggle(&product.name, is_favorite);
                }
                ToggleOutcome::Suppressed => {
                    return Err(CliError::Rejected(
                        "a toggle for this product is already in flight".to_owned(),
                    ));
                }
                ToggleOutcome::Failed => {
                    print_notices(session);
                    return Err(rejection(session, "favorite toggle failed"));
                }
            }
        }
    }

    print_favorites(&session.favorites());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_toggle(name: &str, is_favorite: bool) {
    if is_favorite {
        println!("добавлено в избранное: {name}");
    } else {
        println!("удалено из избранного: {name}");
    }
}

#[allow(clippy::print_stdout)]
fn print_favorites(favorites: &FavoritesSnapshot) {
    if favorites.is_guest() {
        println!("(избранное гостя, сохранено локально)");
    }
    if favorites.items().is_empty() {
        println!("(избранное пусто)");
        return;
    }
    for product in favorites.items() {
        println!(
            "{:>6}  {:<48} {:>14}  {}",
            product.id,
            product.name,
            product.price.to_string(),
            product.part_number
        );
    }
}
