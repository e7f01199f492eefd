use std::sync::Mutex;

/// Form target of the "new bill" button on the bills page
pub const NEW_BILL_ACTION: &str = "/employee/bills/new-bill";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "/employee/bills",
            Route::NewBill => "/employee/bill/new",
        }
    }

    pub fn from_path(pathname: &str) -> Option<Self> {
        [Route::Login, Route::Bills, Route::NewBill]
            .into_iter()
            .find(|r| r.path() == pathname)
    }
}

/// Receives navigation requests issued by page containers
pub trait Navigate: Send + Sync {
    fn navigate(&self, pathname: &str);
}

/// Remembers the last requested path so a handler can answer with a redirect
#[derive(Debug, Default)]
pub struct RedirectNavigator {
    target: Mutex<Option<String>>,
}

impl RedirectNavigator {
    pub fn target(&self) -> Option<String> {
        self.target.lock().ok().and_then(|t| t.clone())
    }
}

impl Navigate for RedirectNavigator {
    fn navigate(&self, pathname: &str) {
        if let Ok(mut target) = self.target.lock() {
            *target = Some(pathname.to_owned());
        }
    }
}
