use crate::domain::model::GroupDiff;
use std::collections::HashSet;

/// Computes the members to add to and delete from a target group so that it
/// matches the source group.
///
/// Members are compared by exact value. Both results keep the order of their
/// input list, and a member listed more than once shows up only once, at its
/// first position.
pub fn diff_members(source: &[String], target: &[String]) -> (Vec<String>, Vec<String>) {
    (missing_from(source, target), missing_from(target, source))
}

/// Members of `needles` that do not appear anywhere in `haystack`.
fn missing_from(needles: &[String], haystack: &[String]) -> Vec<String> {
    let present: HashSet<&str> = haystack.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    needles
        .iter()
        .filter(|member| !present.contains(member.as_str()))
        .filter(|member| seen.insert(member.as_str()))
        .cloned()
        .collect()
}

/// Populates `members_to_add` and `members_to_delete` from the record's
/// current member lists, replacing whatever they held before.
pub fn diff_group(group: &mut GroupDiff) {
    let (to_add, to_delete) = diff_members(&group.source_members, &group.target_members);
    group.members_to_add = to_add;
    group.members_to_delete = to_delete;
}

pub fn diff_all_groups(mut groups: Vec<GroupDiff>) -> Vec<GroupDiff> {
    groups.iter_mut().for_each(diff_group);
    groups
}
