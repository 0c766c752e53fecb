// src/macros.rs

#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Literals, consts, &str slices, owned Strings
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // Concatenate anything that derefs to &str into one owned String.
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

/// Round to `d` decimal places, the way exported metrics are stored.
#[macro_export]
macro_rules! round_to {
    ($v:expr, $d:expr) => {{
        let f = 10f64.powi($d);
        ($v * f).round() / f
    }};
}
