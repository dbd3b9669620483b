//! Defines helper macros for generating domain port error enums.

/// Declare a `thiserror` enum plus one snake-case constructor per variant.
///
/// Constructor parameters accept `impl Into<FieldType>`, so `&str` can be
/// passed for `String` fields.
macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for the constructor generation.
    define_port_error! {
        pub enum LookupError {
            Unavailable => "store unavailable",
            Missing { key: String } => "missing: {key}",
            Partial { key: String, found: u32 } => "partial: {key} ({found})",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(LookupError::unavailable().to_string(), "store unavailable");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = LookupError::missing("fuladdr_01");
        assert_eq!(err.to_string(), "missing: fuladdr_01");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = LookupError::partial("ful_01", 2_u32);
        assert_eq!(err.to_string(), "partial: ful_01 (2)");
    }
}
