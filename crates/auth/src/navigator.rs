//! Navigation hook used when the session ends.

/// Route the embedding application shows when a new login is required.
pub const LOGIN_ROUTE: &str = "/login";

/// Receives navigation requests from the client layer.
///
/// The only request issued today is [`LOGIN_ROUTE`] after a failed token
/// refresh; the embedding application decides what "navigate" means.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, route: &str);
}

/// Default navigator: records the request in the log and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        tracing::warn!(route, "session ended; navigation requested");
    }
}

/// Adapts a closure into a [`Navigator`].
pub struct NavigateFn<F>(pub F);

impl<F> Navigator for NavigateFn<F>
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn navigate(&self, route: &str) {
        (self.0)(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn closure_navigator_receives_route() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let nav = NavigateFn(move |route: &str| sink.lock().unwrap().push(route.to_string()));

        nav.navigate(LOGIN_ROUTE);
        assert_eq!(*seen.lock().unwrap(), vec!["/login".to_string()]);
    }
}
