use lazy_static::lazy_static;
use std::collections::HashMap;
use yansi::Color;

macro_rules! hashmap {
    ($( $key: expr => $val: expr ),*) => {{
         let mut map = ::std::collections::HashMap::new();
         $( map.insert($key, $val); )*
         map
    }}
}

/// Resolves a palette color name, ignoring case.
pub fn to_term_color(color: &str) -> Result<Color, String> {
    match NAMED_COLORS.get(color.to_lowercase().as_str()) {
        None => Err(format!(
            "Color {} not found, available colors are: {}",
            color,
            itertools::join(PALETTE.iter(), ", ")
        )),
        Some(color) => Ok(*color),
    }
}

const PALETTE: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "purple", "cyan", "white",
];

lazy_static! {
    static ref NAMED_COLORS: HashMap<&'static str, Color> = hashmap![
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "purple" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White
    ];
}
