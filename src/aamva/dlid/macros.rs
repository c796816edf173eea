macro_rules! data_elements_enum {
	($(#[$enum_meta:meta])* $vis:vis enum $enum_id:ident { $($(#[$meta:meta])* $field:ident : $ty:ty => $id:ident : $tag:literal),* }) => {
		$(#[$enum_meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis enum $enum_id {
			$($(#[$meta])* $id),*
		}

		impl $enum_id {
			pub const COUNT: usize = $crate::aamva::dlid::data_elements_enum!(@count $($id,)*);

			/// Every element, in the order they are written.
			pub const LIST: [Self; Self::COUNT] = [$(Self::$id),*];

			pub fn from_id(id: &[u8; 3]) -> Option<Self> {
				match id {
					$($tag => Some(Self::$id),)*
					_ => None
				}
			}

			pub fn id(&self) -> &'static [u8; 3] {
				match self {
					$(Self::$id => $tag),*
				}
			}

			pub fn name(&self) -> &'static str {
				match self {
					$(Self::$id => stringify!($field)),*
				}
			}

			/// Position of the element in [`Self::LIST`].
			pub fn position(&self) -> usize {
				*self as usize
			}

			pub fn width(&self) -> usize {
				match self {
					$(Self::$id => <$ty as $crate::aamva::dlid::types::FieldValue>::WIDTH),*
				}
			}

			pub fn truncates(&self) -> bool {
				match self {
					$(Self::$id => <$ty as $crate::aamva::dlid::types::FieldValue>::TRUNCATES),*
				}
			}

			/// Applies the width and character class rule of the element.
			pub fn normalize(
				&self,
				value: &[u8]
			) -> Result<$crate::aamva::dlid::types::Normalized, $crate::aamva::dlid::types::InvalidFieldValue> {
				match self {
					$(Self::$id => <$ty as $crate::aamva::dlid::types::FieldValue>::normalize(value)),*
				}
			}
		}

		impl $enum_id {
			pub fn string_id(&self) -> &str {
				unsafe { std::str::from_utf8_unchecked(self.id()) }
			}
		}

		impl std::fmt::Display for $enum_id {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, "{} ({})", self.name(), self.string_id())
			}
		}
	};
	(@count $a:ident, $($rest:ident,)*) => {
		1usize + $crate::aamva::dlid::data_elements_enum!(@count $($rest,)*)
	};
	(@count) => {
		0usize
	}
}

macro_rules! data_elements {
	($(#[$enum_meta:meta])* $vis:vis enum $enum_id:ident, struct $struct_id:ident ($partial_id:ident) { $($(#[$meta:meta])* $field:ident : $ty:ty => $id:ident : $tag:literal),* }) => {
		$crate::aamva::dlid::data_elements_enum!($(#[$enum_meta])* $vis enum $enum_id { $($(#[$meta])* $field : $ty => $id : $tag),* });

		#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis struct $struct_id {
			$($(#[$meta])* pub $field: Vec<u8>),*
		}

		impl $struct_id {
			pub fn new_with<'a>(mut f: impl FnMut($enum_id) -> std::borrow::Cow<'a, [u8]>) -> Self {
				Self {
					$($field: f($enum_id::$id).into_owned()),*
				}
			}

			pub fn get(&self, element: $enum_id) -> &[u8] {
				match element {
					$($enum_id::$id => self.$field.as_slice()),*
				}
			}

			pub fn iter(&self) -> impl Iterator<Item = ($enum_id, &[u8])> {
				[$(($enum_id::$id, self.$field.as_slice())),*].into_iter()
			}
		}

		#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis struct $partial_id {
			$($(#[$meta])* pub $field: Option<Vec<u8>>),*
		}

		impl $partial_id {
			pub fn new() -> Self {
				Self::default()
			}

			pub fn set(&mut self, element: $enum_id, value: Vec<u8>) {
				match element {
					$($enum_id::$id => { self.$field = Some(value) }),*
				}
			}

			pub fn build(self) -> Result<$struct_id, $crate::aamva::dlid::MissingDataElement<$enum_id>> {
				Ok($struct_id {
					$($field: self.$field.ok_or($crate::aamva::dlid::MissingDataElement($enum_id::$id))?),*
				})
			}
		}
	}
}

pub(crate) use data_elements;
pub(crate) use data_elements_enum;
