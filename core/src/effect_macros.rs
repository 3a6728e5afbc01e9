/// Wrap an async block as an [`Effect::Future`](crate::effect::Effect::Future)
///
/// The block moves its captures and evaluates to `Option<Action>`.
///
/// ```rust,ignore
/// async_effect! {
///     match api.check_availability(query).await {
///         Ok(response) => Some(FormAction::AvailabilityLoaded { .. }),
///         Err(error) => Some(FormAction::AvailabilityFailed { message: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
