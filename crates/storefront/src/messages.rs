//! User-facing notice texts.
//!
//! The storefront ships in Russian; these are the strings the UI shows in
//! transient notices. Server-side validation details are appended where
//! they help (rate-limit cooldowns, order numbers).

// Cart mutation failures.
pub const CART_ADD_FAILED: &str = "Не удалось добавить товар в корзину";
pub const CART_UPDATE_FAILED: &str = "Не удалось обновить количество товара";
pub const CART_REMOVE_FAILED: &str = "Не удалось удалить товар из корзины";
pub const CART_CLEAR_FAILED: &str = "Не удалось очистить корзину";
pub const CART_LOAD_FAILED: &str = "Не удалось загрузить корзину";

// Favorites failures.
pub const FAVORITE_TOGGLE_FAILED: &str = "Не удалось обновить избранное";
pub const FAVORITES_LOAD_FAILED: &str = "Не удалось загрузить избранное";

// Session notices.
pub const SESSION_EXPIRED: &str = "Сессия истекла, войдите снова";
pub const SIGN_IN_REQUIRED: &str = "Войдите, чтобы продолжить";

// Throttling notice; the cooldown in seconds is appended by the caller.
pub const RATE_LIMITED: &str = "Слишком много запросов, попробуйте позже";

// Order notices.
pub const ORDER_CREATED: &str = "Заказ оформлен";
pub const ORDER_CREATE_FAILED: &str = "Не удалось оформить заказ";
pub const ORDER_CANCEL_FAILED: &str = "Не удалось отменить заказ";
