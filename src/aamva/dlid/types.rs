use std::{fmt, io, marker::PhantomData, ops::Deref};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFieldValue {
    #[error("expected exactly {expected} characters, found {len}")]
    WrongLength { len: usize, expected: usize },

    #[error("expected at most {max} characters, found {len}")]
    TooLong { len: usize, max: usize },

    #[error("invalid character in {0}")]
    InvalidCharacter(MaybeAscii),
}

#[derive(Clone, PartialEq, Eq)]
pub struct MaybeAscii(pub Vec<u8>);

impl fmt::Display for MaybeAscii {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "{s:?}"),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

impl fmt::Debug for MaybeAscii {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<InvalidFieldValue> for io::Error {
    fn from(_value: InvalidFieldValue) -> Self {
        io::ErrorKind::InvalidData.into()
    }
}

/// ASCII character class.
///
/// # Safety
///
/// The `contains` function must return only for ASCII bytes.
pub unsafe trait CharClass {
    fn contains(c: u8) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alpha;

unsafe impl CharClass for Alpha {
    fn contains(c: u8) -> bool {
        c.is_ascii_alphabetic()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Numeric;

unsafe impl CharClass for Numeric {
    fn contains(c: u8) -> bool {
        c.is_ascii_digit()
    }
}

/// Printable ASCII, space included.
///
/// Control characters are excluded since the separators of the file format
/// (LF, RS, CR) would otherwise leak into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlphaNumericSpecial;

unsafe impl CharClass for AlphaNumericSpecial {
    fn contains(c: u8) -> bool {
        c.is_ascii() && !c.is_ascii_control()
    }
}

fn check_class<C: CharClass>(bytes: &[u8]) -> Result<(), InvalidFieldValue> {
    if bytes.iter().copied().all(C::contains) {
        Ok(())
    } else {
        Err(InvalidFieldValue::InvalidCharacter(MaybeAscii(
            bytes.to_owned(),
        )))
    }
}

/// Value of a data element once its width rule has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

/// Width rule of a data element.
///
/// An empty value is always accepted: absent optional elements are still
/// written, with a zero-length value.
pub trait FieldValue {
    /// Declared maximum width.
    const WIDTH: usize;

    /// Whether overflowing values are cut to `WIDTH` instead of rejected.
    const TRUNCATES: bool = false;

    fn normalize(value: &[u8]) -> Result<Normalized, InvalidFieldValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed<C: CharClass, const N: usize> {
    data: [u8; N],
    class: PhantomData<C>,
}

impl<C: CharClass, const N: usize> Fixed<C, N> {
    pub fn new(value: impl AsRef<[u8]>) -> Result<Self, InvalidFieldValue> {
        let bytes = value.as_ref();
        check_class::<C>(bytes)?;

        if bytes.len() != N {
            return Err(InvalidFieldValue::WrongLength {
                len: bytes.len(),
                expected: N,
            });
        }

        let mut data = [0u8; N];
        data.copy_from_slice(bytes);

        Ok(Self {
            data,
            class: PhantomData,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl<C: CharClass, const N: usize> FieldValue for Fixed<C, N> {
    const WIDTH: usize = N;

    fn normalize(value: &[u8]) -> Result<Normalized, InvalidFieldValue> {
        let bytes = if value.is_empty() {
            Vec::new()
        } else {
            Self::new(value)?.as_bytes().to_vec()
        };

        Ok(Normalized {
            bytes,
            truncated: false,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable<C: CharClass, const N: usize> {
    data: [u8; N],
    len: usize,
    class: PhantomData<C>,
}

impl<C: CharClass, const N: usize> Variable<C, N> {
    pub fn new(value: impl AsRef<[u8]>) -> Result<Self, InvalidFieldValue> {
        let bytes = value.as_ref();
        let len = bytes.len();
        if len > N {
            return Err(InvalidFieldValue::TooLong { len, max: N });
        }

        check_class::<C>(bytes)?;

        let mut data = [0u8; N];
        data[..len].copy_from_slice(bytes);

        Ok(Self {
            data,
            len,
            class: PhantomData,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn as_str(&self) -> &str {
        unsafe {
            // SAFETY: the character class `C` ensures that all bytes are in the
            //         ASCII range.
            std::str::from_utf8_unchecked(self.as_bytes())
        }
    }
}

impl<C: CharClass, const N: usize> Deref for Variable<C, N> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl<C: CharClass, const N: usize> FieldValue for Variable<C, N> {
    const WIDTH: usize = N;

    fn normalize(value: &[u8]) -> Result<Normalized, InvalidFieldValue> {
        Ok(Normalized {
            bytes: Self::new(value)?.as_bytes().to_vec(),
            truncated: false,
        })
    }
}

/// Variable-length free text, silently cut to `N` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Truncated<C: CharClass, const N: usize> {
    inner: Variable<C, N>,
    truncated: bool,
}

impl<C: CharClass, const N: usize> Truncated<C, N> {
    pub fn new(value: impl AsRef<[u8]>) -> Result<Self, InvalidFieldValue> {
        let bytes = value.as_ref();
        check_class::<C>(bytes)?;

        let truncated = bytes.len() > N;
        let kept = &bytes[..bytes.len().min(N)];

        Ok(Self {
            inner: Variable::new(kept)?,
            truncated,
        })
    }

    pub fn was_truncated(&self) -> bool {
        self.truncated
    }
}

impl<C: CharClass, const N: usize> Deref for Truncated<C, N> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.inner.as_str()
    }
}

impl<C: CharClass, const N: usize> FieldValue for Truncated<C, N> {
    const WIDTH: usize = N;
    const TRUNCATES: bool = true;

    fn normalize(value: &[u8]) -> Result<Normalized, InvalidFieldValue> {
        let v = Self::new(value)?;
        Ok(Normalized {
            bytes: v.inner.as_bytes().to_vec(),
            truncated: v.truncated,
        })
    }
}

pub type F1A = Fixed<Alpha, 1>;
pub type F2A = Fixed<Alpha, 2>;
pub type F3A = Fixed<Alpha, 3>;

pub type F1N = Fixed<Numeric, 1>;
pub type F3N = Fixed<Numeric, 3>;
pub type F8N = Fixed<Numeric, 8>;

pub type F6Ans = Fixed<AlphaNumericSpecial, 6>;
pub type F11Ans = Fixed<AlphaNumericSpecial, 11>;

pub type V12A = Variable<Alpha, 12>;

pub type V5Ans = Variable<AlphaNumericSpecial, 5>;
pub type V6Ans = Variable<AlphaNumericSpecial, 6>;
pub type V12Ans = Variable<AlphaNumericSpecial, 12>;
pub type V25Ans = Variable<AlphaNumericSpecial, 25>;

pub type T20Ans = Truncated<AlphaNumericSpecial, 20>;
pub type T35Ans = Truncated<AlphaNumericSpecial, 35>;
pub type T40Ans = Truncated<AlphaNumericSpecial, 40>;
