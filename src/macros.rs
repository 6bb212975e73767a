/// Resolves the name of the enclosing function at compile time.
///
/// Yields the fully qualified path (`my_crate::module::my_fn`); the
/// channel's [`fn_scope`](crate::ChannelLog::fn_scope) shortens it unless
/// the registry's full-function-signature toggle is on.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        // strip the trailing "::f"
        &name[..name.len() - 3]
    }};
}

/// Opens a `Start:`/`End:` scope at [`Trace`](crate::Level::Trace) level
/// whose message is the enclosing function's name.
///
/// Bind the result, or the scope closes immediately:
///
/// ```rust
/// # let registry = alog::LogRegistry::new();
/// # let ch = registry.channel("MAIN");
/// fn get_it_done(ch: &alog::ChannelLog) {
///     let _scope = alog::fn_log!(ch);
///     ch.info("It's done!");
/// }
/// ```
///
/// Extra arguments are formatted into the parentheses of the message:
/// `fn_log!(ch, "id={}", 42)` logs `Start: my_fn(id=42)`.
#[macro_export]
macro_rules! fn_log {
    ($ch:expr) => {
        $crate::fn_log!($ch, "")
    };
    ($ch:expr, $($arg:tt)*) => {
        $ch.fn_scope(
            $crate::Level::Trace,
            $crate::__function_name!(),
            format_args!($($arg)*),
        )
    };
}

/// Like [`fn_log!`] but at a caller-chosen level.
///
/// `detail_fn_log!(ch, Level::Debug2)` opens the function-trace scope at
/// `debug2` instead of `trace`.
#[macro_export]
macro_rules! detail_fn_log {
    ($ch:expr, $lvl:expr) => {
        $crate::detail_fn_log!($ch, $lvl, "")
    };
    ($ch:expr, $lvl:expr, $($arg:tt)*) => {
        $ch.fn_scope($lvl, $crate::__function_name!(), format_args!($($arg)*))
    };
}
