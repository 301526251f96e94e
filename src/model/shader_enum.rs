use std::mem::size_of;

use static_assertions::{const_assert, const_assert_eq};

cfg_if::cfg_if! {
    if #[cfg(target_arch = "spirv")] {
        /// Integer type underneath every shader-visible enum (shader build).
        pub type EnumBackingType = i32;
    } else {
        /// Integer type underneath every shader-visible enum (host build).
        pub type EnumBackingType = i32;
    }
}

const_assert_eq!(size_of::<EnumBackingType>(), 4);
const_assert!(EnumBackingType::MIN < 0);

/// Declares an enum shared with the shaders.
///
/// The enum is `#[repr(i32)]` to match [`EnumBackingType`], gets raw
/// conversions for uniform upload, and can print itself as WGSL `const`
/// declarations so the shader never spells out the discriminants by hand.
macro_rules! shader_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i32)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant = $value ),+
        }

        const _: () = assert!(
            ::std::mem::size_of::<$name>()
                == ::std::mem::size_of::<$crate::model::EnumBackingType>()
        );

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn to_raw(self) -> $crate::model::EnumBackingType {
                self as $crate::model::EnumBackingType
            }

            pub fn from_raw(raw: $crate::model::EnumBackingType) -> Option<Self> {
                match raw {
                    $( $value => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// `const TYPE_VARIANT: i32 = n;` lines for every variant.
            pub fn wgsl_constants() -> String {
                let prefix = $crate::model::shader_enum::screaming_snake(stringify!($name));
                let mut wgsl = String::new();
                $(
                    wgsl.push_str(&format!(
                        "const {}_{}: i32 = {};\n",
                        prefix,
                        $crate::model::shader_enum::screaming_snake(stringify!($variant)),
                        $name::$variant.to_raw(),
                    ));
                )+
                wgsl
            }
        }

        impl ::std::convert::TryFrom<$crate::model::EnumBackingType> for $name {
            type Error = ::anyhow::Error;

            fn try_from(raw: $crate::model::EnumBackingType) -> ::anyhow::Result<Self> {
                $name::from_raw(raw).ok_or_else(|| {
                    ::anyhow::anyhow!("{} is not a valid {}", raw, stringify!($name))
                })
            }
        }

        impl From<$name> for $crate::model::EnumBackingType {
            fn from(value: $name) -> Self {
                value.to_raw()
            }
        }
    };
}

pub(crate) use shader_enum;

/// `StereoType` -> `STEREO_TYPE`.
pub fn screaming_snake(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(ch.to_uppercase());
    }
    out
}
