//! Session-related types.
//!
//! The visitor's shop state (cart, category selection, panel flag) is the
//! only thing stored in the session.

use tower_sessions::Session;

use techstore_core::{Action, Catalog, ShopState};

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's shop state.
    pub const SHOP_STATE: &str = "shop_state";
}

/// Load the visitor's shop state, starting fresh when none is stored.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value cannot be
/// decoded.
pub async fn load_shop_state(session: &Session) -> Result<ShopState, tower_sessions::session::Error> {
    Ok(session
        .get::<ShopState>(keys::SHOP_STATE)
        .await?
        .unwrap_or_default())
}

/// Store the visitor's shop state.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_shop_state(
    session: &Session,
    state: &ShopState,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::SHOP_STATE, state).await
}

/// Apply one action to the visitor's shop state and persist it if it changed.
///
/// Returns the updated state.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn dispatch(
    session: &Session,
    catalog: &Catalog,
    action: Action,
) -> Result<ShopState, tower_sessions::session::Error> {
    let mut state = load_shop_state(session).await?;
    if state.dispatch(action, catalog) {
        save_shop_state(session, &state).await?;
    }
    Ok(state)
}
