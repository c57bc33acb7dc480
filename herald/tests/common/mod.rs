use herald::{BoxError, Handler, SharedHandler, share};

// ============================================================================
// Shared test handlers
// ============================================================================

pub fn greet() -> impl Handler<String, Output = String> {
    |name: String| async move { Ok::<_, BoxError>(format!("Hello, {name}")) }
}

pub fn busy() -> SharedHandler<String, String> {
    share(|name: String| async move { Ok::<_, BoxError>(format!("Busy: {name}")) })
}

pub fn fixed(output: &'static str) -> SharedHandler<String, String> {
    share(move |_param: String| async move { Ok::<_, BoxError>(output.to_string()) })
}

pub fn failing(message: &'static str) -> impl Handler<String, Output = String> {
    move |_param: String| async move { Err::<String, BoxError>(message.into()) }
}
