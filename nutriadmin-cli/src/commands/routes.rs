use anyhow::Result;
use shared::guard::{Decision, Route, default_route, reachable_routes};

use super::Context;

/// Print the views the current session may open, marking its home view.
///
/// # Errors
/// Returns an error if the stored session cannot be read.
pub fn list_routes(ctx: &Context) -> Result<()> {
    let store = ctx.load_session()?;
    let session = store.session();
    let home = session.map(|session| default_route(session.role));

    match session {
        Some(session) => println!("Signed in as {} ({})", session.user_id, session.role),
        None => println!("Not signed in"),
    }
    for route in reachable_routes(session) {
        let marker = if Some(route) == home { " (home)" } else { "" };
        println!("  {:<16}{route:?}{marker}", route.path());
    }
    Ok(())
}

/// Print where navigating to `route` leads for the current session.
///
/// # Errors
/// Returns an error if the stored session cannot be read.
pub fn check_route(ctx: &Context, route: Route) -> Result<()> {
    let store = ctx.load_session()?;
    match store.resolve(route) {
        Decision::Allow => println!("{route}: allowed"),
        Decision::Redirect(target) => println!("{route}: redirects to {target}"),
    }
    Ok(())
}
