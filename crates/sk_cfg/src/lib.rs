//! Compile-time configuration aliases shared by the `sk_*` crates.
//!
//! A crate declares its aliases once, at the crate root:
//!
//! ```
//! pub mod cfg {
//!     sk_cfg::define_alias! {
//!         #[cfg(debug_assertions)] => debug,
//!     }
//! }
//!
//! cfg::debug! {
//!     if {
//!         const MODE: &str = "checked";
//!     } else {
//!         const MODE: &str = "unchecked";
//!     }
//! }
//!
//! assert_eq!(MODE, if cfg!(debug_assertions) { "checked" } else { "unchecked" });
//! ```
//!
//! Every alias is a macro with three forms:
//!
//! - `alias! { .. }` keeps the tokens only when the condition holds.
//! - `alias! { if { .. } else { .. } }` picks one branch.
//! - `alias!()` expands to a `bool` literal.
#![no_std]

/// Passes the provided code through unchanged.
///
/// Aliases whose condition is active are re-exports of this macro.
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($p)* };
    ($($p:tt)*) => { $($p)* };
}

/// Suppresses the provided code.
///
/// Aliases whose condition is inactive are re-exports of this macro.
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($n)* };
    ($($p:tt)*) => {};
}

/// Selects the first arm whose condition holds.
///
/// Conditions are either `#[cfg(..)]` attributes or alias names
/// created by [`define_alias!`], `_` matches everything.
///
/// ```
/// sk_cfg::switch! {
///     #[cfg(any())] => { const LEVEL: u8 = 0; }
///     _ => { const LEVEL: u8 = 1; }
/// }
///
/// assert_eq!(LEVEL, 1);
/// ```
#[macro_export]
macro_rules! switch {
    ({ $($tt:tt)* }) => {{
        $crate::switch! { $($tt)* }
    }};
    (_ => { $($output:tt)* }) => {
        $($output)*
    };
    (
        #[cfg($cfg:meta)] => $output:tt
        $($( $rest:tt )+)?
    ) => {
        #[cfg($cfg)]
        $crate::switch! { _ => $output }
        $(
            #[cfg(not($cfg))]
            $crate::switch! { $($rest)+ }
        )?
    };
    (
        $cfg:ident => $output:tt
        $($( $rest:tt )+)?
    ) => {
        $cfg! {
            if {
                $crate::switch! { _ => $output }
            } else {
                $(
                    $crate::switch! { $($rest)+ }
                )?
            }
        }
    };
}

/// Declares one alias macro per `#[cfg(..)] => name` pair.
#[macro_export]
macro_rules! define_alias {
    (
        #[cfg($meta:meta)] => $p:ident
        $(, $( $rest:tt )+)?
    ) => {
        $crate::define_alias! {
            #[cfg($meta)] => { $p }
            $(
                $($rest)+
            )?
        }
    };
    (
        #[cfg($meta:meta)] => $p:ident,
        $($( $rest:tt )+)?
    ) => {
        $crate::define_alias! {
            #[cfg($meta)] => { $p }
            $(
                $($rest)+
            )?
        }
    };
    (
        #[cfg($meta:meta)] => {
            $(#[$p_meta:meta])*
            $p:ident
        }
        $($( $rest:tt )+)?
    ) => {
        $crate::switch! {
            #[cfg($meta)] => {
                $(#[$p_meta])*
                #[doc(inline)]
                #[doc = concat!("Passes the provided code because `#[cfg(", stringify!($meta), ")]` is active.")]
                pub use $crate::enabled as $p;
            }
            _ => {
                $(#[$p_meta])*
                #[doc(inline)]
                #[doc = concat!("Suppresses the provided code because `#[cfg(", stringify!($meta), ")]` is not active.")]
                pub use $crate::disabled as $p;
            }
        }
        $(
            $crate::define_alias! {
                $($rest)+
            }
        )?
    };
}

#[cfg(test)]
mod tests {
    mod cfg {
        crate::define_alias! {
            #[cfg(all())] => always,
            #[cfg(any())] => never,
        }
    }

    #[test]
    fn bool_form() {
        assert!(cfg::always!());
        assert!(!cfg::never!());
    }

    #[test]
    fn branch_form() {
        let picked = cfg::never! {
            if { 1 } else { 2 }
        };
        assert_eq!(picked, 2);

        let picked = cfg::always! {
            if { 1 } else { 2 }
        };
        assert_eq!(picked, 1);
    }

    #[test]
    fn switch_on_alias() {
        use cfg::{always, never};

        let level = crate::switch! {{
            never => { 0 }
            always => { 1 }
            _ => { 2 }
        }};
        assert_eq!(level, 1);
    }
}
