//! Relationships between factions and tag-derived faction groups.
//!
//! Most factions only have explicit relations with a handful of named rivals;
//! broad attitudes ("toward human nobility in general") are written once at
//! the group level. Lookup therefore falls back in three tiers:
//!
//! 1. the exact pair, stored in both directions;
//! 2. every combination of `[id] + groups(id)` for both sides, preferring
//!    combinations closer to the original ids and then non-zero scores.
//!    Remaining ties go to the candidate with the smaller `min(i, j)`, then
//!    to the lexicographically smaller sorted id pair, so `(a, b)` and
//!    `(b, a)` always pick the same relation;
//! 3. neutral (score 0).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::definition::FactionDefinition;

/// Score at or below which two parties are hostile.
pub const HOSTILE_THRESHOLD: i32 = -25;
/// Score at or above which two parties are friendly.
pub const FRIENDLY_THRESHOLD: i32 = 25;

/// A relationship between two factions or groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// First party.
    pub a: String,
    /// Second party.
    pub b: String,
    /// Score, nominally -100..100.
    #[serde(default)]
    pub score: i32,
    /// Sentiment label such as `allied` or `hate`.
    #[serde(default = "neutral_sentiment")]
    pub sentiment: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

fn neutral_sentiment() -> String {
    "neutral".to_string()
}

/// A group whose members are the factions carrying any of its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    /// Group id, usable anywhere a faction id is.
    pub group_id: String,
    /// A faction with any of these tags belongs to the group.
    #[serde(default)]
    pub match_tags_any: Vec<String>,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// A resolved relation and the id pair that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationMatch<'a> {
    /// The matching relation.
    pub relation: &'a Relation,
    /// Left id of the matching pair (the original or one of its groups).
    pub via_a: &'a str,
    /// Right id of the matching pair.
    pub via_b: &'a str,
    /// Whether the match was the exact requested pair.
    pub exact: bool,
}

/// Read-only relationship index.
#[derive(Debug, Clone, Default)]
pub struct RelationshipResolver {
    relations: Vec<Relation>,
    pair_index: HashMap<(String, String), usize>,
    groups: BTreeMap<String, GroupRule>,
    tag_to_groups: HashMap<String, BTreeSet<String>>,
    faction_tags: HashMap<String, Vec<String>>,
}

impl RelationshipResolver {
    /// Build the index. Later relations for the same pair replace earlier ones.
    pub fn new(
        relations: Vec<Relation>,
        groups: Vec<GroupRule>,
        definitions: &BTreeMap<String, FactionDefinition>,
    ) -> Self {
        let mut pair_index = HashMap::new();
        for (idx, rel) in relations.iter().enumerate() {
            pair_index.insert((rel.a.clone(), rel.b.clone()), idx);
            pair_index.insert((rel.b.clone(), rel.a.clone()), idx);
        }

        let mut tag_to_groups: HashMap<String, BTreeSet<String>> = HashMap::new();
        for rule in &groups {
            for tag in &rule.match_tags_any {
                tag_to_groups
                    .entry(tag.clone())
                    .or_default()
                    .insert(rule.group_id.clone());
            }
        }

        let faction_tags = definitions
            .iter()
            .map(|(id, def)| (id.clone(), def.tags.clone()))
            .collect();

        tracing::debug!(
            relations = relations.len(),
            groups = groups.len(),
            "built relationship index"
        );

        Self {
            relations,
            pair_index,
            groups: groups.into_iter().map(|g| (g.group_id.clone(), g)).collect(),
            tag_to_groups,
            faction_tags,
        }
    }

    /// All loaded relations, in load order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// All group rules by id.
    pub fn groups(&self) -> &BTreeMap<String, GroupRule> {
        &self.groups
    }

    /// `[id]` followed by the sorted ids of every group the faction belongs to.
    /// A group id resolves to itself only.
    pub fn resolve_ids(&self, id: &str) -> Vec<String> {
        let mut ids = vec![id.to_string()];
        if self.groups.contains_key(id) {
            return ids;
        }
        if let Some(tags) = self.faction_tags.get(id) {
            let matched: BTreeSet<&String> = tags
                .iter()
                .filter_map(|t| self.tag_to_groups.get(t))
                .flatten()
                .collect();
            ids.extend(matched.into_iter().cloned());
        }
        ids
    }

    fn pair(&self, a: &str, b: &str) -> Option<&Relation> {
        self.pair_index
            .get(&(a.to_string(), b.to_string()))
            .and_then(|&idx| self.relations.get(idx))
    }

    /// Resolve a relation and report which pair matched.
    pub fn resolve(&self, a: &str, b: &str) -> Option<RelationMatch<'_>> {
        if let Some(relation) = self.pair(a, b) {
            let (via_a, via_b) = oriented(relation, a);
            return Some(RelationMatch {
                relation,
                via_a,
                via_b,
                exact: true,
            });
        }

        let a_ids = self.resolve_ids(a);
        let b_ids = self.resolve_ids(b);
        let mut best: Option<(CandidateRank<'_>, RelationMatch<'_>)> = None;
        for (i, ai) in a_ids.iter().enumerate() {
            for (j, bj) in b_ids.iter().enumerate() {
                let Some(relation) = self.pair(ai, bj) else {
                    continue;
                };
                let mut priority = 100 - i as i64 - j as i64;
                if relation.score != 0 {
                    priority += 10;
                }
                let (via_a, via_b) = oriented(relation, ai);
                let rank = CandidateRank {
                    priority,
                    nearest: i.min(j),
                    pair: if via_a <= via_b {
                        (via_a, via_b)
                    } else {
                        (via_b, via_a)
                    },
                };
                if best.as_ref().is_none_or(|(current, _)| rank.beats(current)) {
                    best = Some((
                        rank,
                        RelationMatch {
                            relation,
                            via_a,
                            via_b,
                            exact: false,
                        },
                    ));
                }
            }
        }
        best.map(|(_, m)| m)
    }

    /// The relation between two ids, if any tier matches.
    pub fn get_relation(&self, a: &str, b: &str) -> Option<&Relation> {
        self.resolve(a, b).map(|m| m.relation)
    }

    /// Score between two ids (0 when nothing matches).
    pub fn get_score(&self, a: &str, b: &str) -> i32 {
        self.get_relation(a, b).map_or(0, |r| r.score)
    }

    /// Sentiment between two ids (`neutral` when nothing matches).
    pub fn get_sentiment(&self, a: &str, b: &str) -> &str {
        self.get_relation(a, b)
            .map_or("neutral", |r| r.sentiment.as_str())
    }

    /// Every relation involving the id or one of its groups, without duplicates.
    /// Relations shadowed by a later entry for the same pair are skipped.
    pub fn get_all_relations_for(&self, id: &str) -> Vec<&Relation> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for rid in self.resolve_ids(id) {
            for (idx, rel) in self.relations.iter().enumerate() {
                let current = self.pair_index.get(&(rel.a.clone(), rel.b.clone())) == Some(&idx);
                if current && (rel.a == rid || rel.b == rid) && seen.insert(idx) {
                    out.push(rel);
                }
            }
        }
        out
    }

    /// Whether the score is at or below [`HOSTILE_THRESHOLD`].
    pub fn is_hostile(&self, a: &str, b: &str) -> bool {
        self.get_score(a, b) <= HOSTILE_THRESHOLD
    }

    /// Whether the score is at or above [`FRIENDLY_THRESHOLD`].
    pub fn is_friendly(&self, a: &str, b: &str) -> bool {
        self.get_score(a, b) >= FRIENDLY_THRESHOLD
    }
}

/// Ordering key for a group-fallback candidate. Every field is independent of
/// argument order.
#[derive(Debug, Clone, Copy)]
struct CandidateRank<'a> {
    priority: i64,
    nearest: usize,
    pair: (&'a str, &'a str),
}

impl CandidateRank<'_> {
    fn beats(&self, other: &Self) -> bool {
        self.priority
            .cmp(&other.priority)
            .then(other.nearest.cmp(&self.nearest))
            .then(other.pair.cmp(&self.pair))
            .is_gt()
    }
}

/// Orient a stored relation so the first id is `left`.
fn oriented<'a>(relation: &'a Relation, left: &str) -> (&'a str, &'a str) {
    if relation.a == left {
        (&relation.a, &relation.b)
    } else {
        (&relation.b, &relation.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn def(id: &str, tags: &[&str]) -> (String, FactionDefinition) {
        let json = serde_json::json!({
            "faction_id": id,
            "name": id,
            "tags": tags,
        });
        (id.to_string(), serde_json::from_value(json).unwrap())
    }

    fn rel(a: &str, b: &str, score: i32) -> Relation {
        Relation {
            a: a.into(),
            b: b.into(),
            score,
            sentiment: if score < 0 { "hate".into() } else { "ally".into() },
            notes: String::new(),
        }
    }

    fn group(id: &str, tags: &[&str]) -> GroupRule {
        GroupRule {
            group_id: id.into(),
            match_tags_any: tags.iter().map(|t| t.to_string()).collect(),
            description: String::new(),
        }
    }

    fn resolver() -> RelationshipResolver {
        let defs: BTreeMap<_, _> = [
            def("crown", &["human", "nobility"]),
            def("guild", &["human", "merchant"]),
            def("horde", &["orc"]),
            def("hermits", &[]),
        ]
        .into_iter()
        .collect();
        RelationshipResolver::new(
            vec![
                rel("crown", "horde", -60),
                rel("g_nobility", "g_orcs", -30),
                rel("g_humans", "g_orcs", -10),
                rel("guild", "g_orcs", 0),
                rel("g_merchants", "g_orcs", 15),
            ],
            vec![
                group("g_humans", &["human"]),
                group("g_nobility", &["nobility"]),
                group("g_merchants", &["merchant"]),
                group("g_orcs", &["orc"]),
            ],
            &defs,
        )
    }

    #[test]
    fn resolve_ids_sorted_groups() {
        let r = resolver();
        assert_eq!(r.resolve_ids("crown"), vec!["crown", "g_humans", "g_nobility"]);
        assert_eq!(r.resolve_ids("g_orcs"), vec!["g_orcs"]);
        assert_eq!(r.resolve_ids("unknown"), vec!["unknown"]);
    }

    #[test]
    fn exact_pair_wins() {
        let r = resolver();
        let m = r.resolve("crown", "horde").unwrap();
        assert!(m.exact);
        assert_eq!(m.relation.score, -60);
        assert_eq!((m.via_a, m.via_b), ("crown", "horde"));
    }

    #[test]
    fn exact_pair_is_symmetric() {
        let r = resolver();
        assert_eq!(r.get_score("horde", "crown"), -60);
        let m = r.resolve("horde", "crown").unwrap();
        assert_eq!((m.via_a, m.via_b), ("horde", "crown"));
    }

    #[test]
    fn group_fallback_prefers_closer_expansion() {
        let r = resolver();
        // crown vs g_orcs: candidates (g_humans, g_orcs) at i=1 and
        // (g_nobility, g_orcs) at i=2; both non-zero so the closer one wins.
        let m = r.resolve("crown", "g_orcs").unwrap();
        assert!(!m.exact);
        assert_eq!(m.via_a, "g_humans");
        assert_eq!(m.relation.score, -10);
    }

    #[test]
    fn non_zero_score_beats_closer_zero() {
        let r = resolver();
        // guild vs horde: (guild, g_orcs) has priority 99 but score 0;
        // (g_humans, g_orcs) has 98 + 10; (g_merchants, g_orcs) 97 + 10.
        let m = r.resolve("guild", "horde").unwrap();
        assert_eq!(m.via_a, "g_humans");
        assert_eq!(r.get_score("guild", "horde"), -10);
    }

    #[test]
    fn neutral_default() {
        let r = resolver();
        assert!(r.get_relation("hermits", "horde").is_none());
        assert_eq!(r.get_score("hermits", "horde"), 0);
        assert_eq!(r.get_sentiment("hermits", "horde"), "neutral");
    }

    #[test]
    fn hostility_thresholds() {
        let r = resolver();
        assert!(r.is_hostile("crown", "horde"));
        assert!(!r.is_friendly("crown", "horde"));
        assert!(!r.is_hostile("hermits", "horde"));
    }

    #[test]
    fn all_relations_for_includes_groups() {
        let r = resolver();
        let rels = r.get_all_relations_for("crown");
        assert_eq!(rels.len(), 3);
        assert_eq!(rels[0].b, "horde");
    }

    /// Two factions whose group pairs tie on priority in either direction.
    fn crossed_resolver() -> RelationshipResolver {
        let defs: BTreeMap<_, _> = [def("a", &["x"]), def("b", &["y"])].into_iter().collect();
        RelationshipResolver::new(
            vec![rel("g_x", "b", -50), rel("a", "g_y", 50)],
            vec![group("g_x", &["x"]), group("g_y", &["y"])],
            &defs,
        )
    }

    #[test]
    fn crossed_group_tie_is_order_independent() {
        let r = crossed_resolver();
        // (a, g_y) and (g_x, b) both score 99 + 10 with min(i, j) = 0;
        // the sorted pair ("a", "g_y") sorts first.
        assert_eq!(r.get_score("a", "b"), 50);
        assert_eq!(r.get_score("b", "a"), 50);
        let forward = r.resolve("a", "b").unwrap();
        let backward = r.resolve("b", "a").unwrap();
        assert!(std::ptr::eq(forward.relation, backward.relation));
        assert_eq!((forward.via_a, forward.via_b), ("a", "g_y"));
        assert_eq!((backward.via_a, backward.via_b), ("g_y", "a"));
    }

    #[test]
    fn equal_priority_prefers_smaller_min_index() {
        let defs: BTreeMap<_, _> = [def("a", &["x"]), def("b", &["y", "z"])]
            .into_iter()
            .collect();
        // (a, g_z) at i=0, j=2 and (g_x, g_y) at i=1, j=1 both score 98 + 10.
        let r = RelationshipResolver::new(
            vec![rel("g_x", "g_y", -40), rel("a", "g_z", 40)],
            vec![group("g_x", &["x"]), group("g_y", &["y"]), group("g_z", &["z"])],
            &defs,
        );
        assert_eq!(r.get_score("a", "b"), 40);
        assert_eq!(r.get_score("b", "a"), 40);
    }

    proptest! {
        #[test]
        fn lookup_is_symmetric(
            a in prop::sample::select(vec!["crown", "guild", "horde", "hermits", "g_orcs", "g_humans"]),
            b in prop::sample::select(vec!["crown", "guild", "horde", "hermits", "g_orcs", "g_humans"]),
        ) {
            let r = resolver();
            prop_assert_eq!(r.get_score(a, b), r.get_score(b, a));
        }

        #[test]
        fn crossed_lookup_is_symmetric(
            a in prop::sample::select(vec!["a", "b", "g_x", "g_y"]),
            b in prop::sample::select(vec!["a", "b", "g_x", "g_y"]),
        ) {
            let r = crossed_resolver();
            prop_assert_eq!(r.get_relation(a, b), r.get_relation(b, a));
        }
    }
}
