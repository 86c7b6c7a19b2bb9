//! Card colour palette

/// A named card colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardColor {
	/// Name shown in the colour picker.
	pub name: &'static str,
	/// Light shade used for swatches.
	pub display: &'static str,
	/// Dark shade used as the card background.
	pub value: &'static str,
}

/// The palette, indexed by [`Card::color`](crate::Card::color).
pub static CARD_COLORS: [CardColor; 10] = [
	CardColor { name: "Blue", display: "#608DFF", value: "#0031AF" },
	CardColor { name: "Purple", display: "#D9A7FF", value: "#681CA2" },
	CardColor { name: "Pink", display: "#FFB9EB", value: "#A82783" },
	CardColor { name: "Golden", display: "#FFD056", value: "#B8992B" },
	CardColor { name: "Green", display: "#C1FF90", value: "#4D871F" },
	CardColor { name: "Teal", display: "#92DEFF", value: "#1A779F" },
	CardColor { name: "Red", display: "#FE8D8D", value: "#A70E0E" },
	CardColor { name: "Brown", display: "#FFAC7D", value: "#96491F" },
	CardColor { name: "Lime", display: "#E8F34F", value: "#696E1C" },
	CardColor { name: "Tosca", display: "#78F4C7", value: "#2B8665" },
];

/// Returns the colour at `index`.
pub fn card_color(index: usize) -> Option<&'static CardColor> {
	CARD_COLORS.get(index)
}
