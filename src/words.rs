pub const WORDS: &[&str] = &[
    "able", "acid", "alpha", "amber", "apple", "arrow", "atlas", "badge", "baker", "beach", "berry",
    "blade", "blaze", "bloom", "board", "bonus", "brave", "brick", "bring", "cabin", "candy",
    "cargo", "chair", "charm", "chess", "cider", "civic", "cloud", "coast", "coral", "crane",
    "crisp", "crown", "dance", "delta", "depth", "diary", "dizzy", "drift", "eagle", "earth",
    "elbow", "ember", "equal", "fable", "fancy", "feast", "fiber", "flame", "flint", "focus",
    "forge", "frost", "fruit", "giant", "glass", "globe", "grape", "grass", "habit", "happy",
    "harbor", "heart", "honey", "house", "hyper", "ivory", "jelly", "jolly", "judge", "karma",
    "kayak", "kiosk", "knife", "label", "lemon", "level", "light", "lunar", "magic", "maple",
    "march", "metal", "minor", "mango", "noble", "north", "novel", "ocean", "olive", "opera",
    "orbit", "paint", "panel", "pearl", "piano", "pixel", "plaza", "pluto", "prism", "quick",
    "quiet", "radar", "raven", "relay", "river", "robin", "royal", "salad", "scale", "shade",
    "shelf", "shine", "solar", "sonic", "spark", "spice", "storm", "sugar", "swift", "table",
    "tango", "tiger", "toast", "token", "topaz", "trail", "ultra", "umbra", "union", "urban",
    "valid", "vapor", "velvet", "vivid", "voice", "waltz", "water", "whale", "wheat", "xenon",
    "yacht", "yield", "young", "zebra", "zesty",
];

pub const BONUS_WORDS: &[&str] = &[
    "adventure", "avalanche", "blueprint", "butterfly", "celebrate", "chocolate",
    "constellation", "crocodile", "discovery", "electricity", "fireworks", "galaxy",
    "harmonica", "imagination", "kaleidoscope", "labyrinth", "marvelous", "nightingale",
    "orchestra", "phenomenon", "rhapsody", "symphony", "thunderstorm", "wonderland",
];
