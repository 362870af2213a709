use std::fmt::{self, Display, Formatter};

/// Creates an enum with `AsRef<str>` impl and a lookup by that string.
macro_rules! str_enum {
    (
        $(#[$attr:meta])*
        pub enum $E:ident {
            $(
                $(#[$v_attr:meta])*
                $V:ident = $by:expr
            ),*$(,)?
        }
    ) => {
        $(#[$attr])*
        pub enum $E {
            $(
                $(#[$v_attr])*
                $V,
            )*
        }

        impl $E {
            /// Returns the variant whose string representation is `name`, if any.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($by => Some($E::$V),)*
                    _ => None,
                }
            }
        }

        impl std::convert::AsRef<str> for $E {
            fn as_ref(&self) -> &str {
                match *self {
                    $($E::$V => $by,)*
                }
            }
        }

        impl std::fmt::Display for $E {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(std::convert::AsRef::<str>::as_ref(self))
            }
        }
    }
}

/// Writes the items of `t` separated by `sep`.
pub fn fmt_join<T: Display>(t: &[T], sep: &str, f: &mut Formatter<'_>) -> fmt::Result {
    let mut iter = t.iter();
    if let Some(t) = iter.next() {
        Display::fmt(t, f)?;
        for t in iter {
            write!(f, "{}{}", sep, t)?;
        }
    }
    Ok(())
}

/// `Display` adapter over `fmt_join`.
pub struct Join<'a, T>(pub &'a [T], pub &'a str);

impl<'a, T: Display> Display for Join<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_join(self.0, self.1, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    str_enum! {
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub enum Fruit {
            Apple = "apple",
            Pear = "pear",
        }
    }

    #[test]
    fn str_enum_lookup() {
        assert_eq!(Fruit::from_name("apple"), Some(Fruit::Apple));
        assert_eq!(Fruit::from_name("pear"), Some(Fruit::Pear));
        assert_eq!(Fruit::from_name("Pear"), None);
        assert_eq!(Fruit::Pear.as_ref(), "pear");
        assert_eq!(Fruit::Apple.to_string(), "apple");
    }

    #[test]
    fn join() {
        assert_eq!(Join::<u8>(&[], ",").to_string(), "");
        assert_eq!(Join(&["a"], ",").to_string(), "a");
        assert_eq!(Join(&["a", "b", "c"], ";").to_string(), "a;b;c");
    }
}
