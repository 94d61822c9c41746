/// (abbreviation, city, nickname)
const NFL_TEAMS: [(&str, &str, &str); 32] = [
    ("ARI", "Arizona", "Cardinals"),
    ("ATL", "Atlanta", "Falcons"),
    ("BAL", "Baltimore", "Ravens"),
    ("BUF", "Buffalo", "Bills"),
    ("CAR", "Carolina", "Panthers"),
    ("CHI", "Chicago", "Bears"),
    ("CIN", "Cincinnati", "Bengals"),
    ("CLE", "Cleveland", "Browns"),
    ("DAL", "Dallas", "Cowboys"),
    ("DEN", "Denver", "Broncos"),
    ("DET", "Detroit", "Lions"),
    ("GB", "Green Bay", "Packers"),
    ("HOU", "Houston", "Texans"),
    ("IND", "Indianapolis", "Colts"),
    ("JAX", "Jacksonville", "Jaguars"),
    ("KC", "Kansas City", "Chiefs"),
    ("LV", "Las Vegas", "Raiders"),
    ("LAC", "Los Angeles", "Chargers"),
    ("LAR", "Los Angeles", "Rams"),
    ("MIA", "Miami", "Dolphins"),
    ("MIN", "Minnesota", "Vikings"),
    ("NE", "New England", "Patriots"),
    ("NO", "New Orleans", "Saints"),
    ("NYG", "New York", "Giants"),
    ("NYJ", "New York", "Jets"),
    ("PHI", "Philadelphia", "Eagles"),
    ("PIT", "Pittsburgh", "Steelers"),
    ("SF", "San Francisco", "49ers"),
    ("SEA", "Seattle", "Seahawks"),
    ("TB", "Tampa Bay", "Buccaneers"),
    ("TEN", "Tennessee", "Titans"),
    ("WSH", "Washington", "Commanders"),
];

/// Abbreviations ESPN has used that differ from the table above.
const ALIASES: [(&str, &str); 3] = [("WAS", "WSH"), ("JAC", "JAX"), ("LA", "LAR")];

/// Resolves a pick label (full name, nickname, city or abbreviation) to the
/// team's abbreviation. Unknown labels come back upper-cased.
#[must_use]
pub fn team_abbr(label: &str) -> String {
    let label = label.trim();
    let upper = label.to_uppercase();

    if let Some((_, abbr)) = ALIASES.iter().find(|(alias, _)| *alias == upper) {
        return (*abbr).to_string();
    }
    if NFL_TEAMS.iter().any(|(abbr, _, _)| *abbr == upper) {
        return upper;
    }

    for (abbr, city, nickname) in NFL_TEAMS {
        let full = format!("{city} {nickname}");
        if label.eq_ignore_ascii_case(&full) || label.eq_ignore_ascii_case(nickname) {
            return abbr.to_string();
        }
    }

    // city alone is ambiguous for LA and NY
    let mut by_city = NFL_TEAMS
        .iter()
        .filter(|(_, city, _)| label.eq_ignore_ascii_case(city));
    match (by_city.next(), by_city.next()) {
        (Some((abbr, _, _)), None) => (*abbr).to_string(),
        _ => upper,
    }
}
