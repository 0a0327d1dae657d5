/// Default search queries: known classics by name, era and genre sweeps,
/// director searches, and public-domain phrasing. Order matters only for
/// discovery order; dedup keeps the first hit of a URL.
pub const SEARCH_QUERIES: &[&str] = &[
    // Known classic films
    "Casablanca 1942",
    "Citizen Kane 1941",
    "Metropolis 1927",
    "Nosferatu 1922",
    "The Cabinet of Dr Caligari",
    "The General Buster Keaton",
    "Modern Times Chaplin",
    "City Lights Chaplin",
    "The 39 Steps Hitchcock",
    "The Maltese Falcon",
    "Double Indemnity",
    "Sunset Boulevard",
    "The Third Man",
    // Era + genre combinations
    "1920s silent feature film",
    "1930s classic film noir",
    "1940s hollywood classic",
    "1950s feature film",
    "pre-code hollywood 1930s",
    "golden age cinema 1940s",
    "classic westerns 1950s",
    "vintage horror 1930s",
    // Director searches
    "Hitchcock classic film",
    "Chaplin feature film",
    "Orson Welles film",
    "Fritz Lang film",
    "John Ford western",
    "Frank Capra film",
    // Public domain indicators
    "public domain feature film",
    "copyright free classic movie",
    "classic cinema full movie",
];
