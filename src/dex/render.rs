use crate::data::loader::Pokedex;
use crate::data::team::{Team, TEAM_SIZE};
use crate::dex::coverage::coverage;

/// Render the six team slots followed by the net coverage.
pub fn render_team(pokedex: &Pokedex, team: &Team) -> String {
    let members = team.resolve(pokedex);
    let mut s = String::new();
    s.push_str(&format!("Team ({}/{})\n", members.len(), TEAM_SIZE));

    for slot in 0..TEAM_SIZE {
        match members.get(slot) {
            Some(record) => s.push_str(&format!(
                "{}: #{:04} {} [{}]\n",
                slot + 1,
                record.id,
                record.name,
                record.types.join("/")
            )),
            None => s.push_str(&format!("{}: (empty)\n", slot + 1)),
        }
    }

    if !members.is_empty() {
        let result = coverage(&members);
        s.push_str(&format!("Weak to: {}\n", tag_list(&result.weaknesses)));
        s.push_str(&format!("Resists: {}\n", tag_list(&result.resistances)));
    }

    s
}

fn tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        "None".to_string()
    } else {
        tags.join(", ")
    }
}
