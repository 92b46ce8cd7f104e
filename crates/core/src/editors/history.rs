use super::without;
use crate::error::{EditorError, EditorResult};
use crate::record::history::{FamilyMember, HistoryChange, HistorySlice, SocialHistory};
use crate::record::SectionId;
use hims_types::{is_blank, normalise_entry};
use hims_uuid::EntityId;

pub struct HistoryEditor<'a> {
    slice: &'a HistorySlice,
}

impl<'a> HistoryEditor<'a> {
    pub fn new(slice: &'a HistorySlice) -> Self {
        Self { slice }
    }

    pub fn set_present_illness(&self, text: impl Into<String>) -> HistoryChange {
        HistoryChange::PresentIllness(text.into())
    }

    pub fn set_past_history(&self, text: impl Into<String>) -> HistoryChange {
        HistoryChange::PastHistory(text.into())
    }

    pub fn set_family_history(&self, text: impl Into<String>) -> HistoryChange {
        HistoryChange::FamilyHistory(text.into())
    }

    pub fn add_family_member(&self, relation: &str, condition: &str) -> EditorResult<HistoryChange> {
        if is_blank(relation) {
            return Err(EditorError::BlankEntry("relation"));
        }
        let mut members = self.slice.family_members.clone();
        members.push(FamilyMember {
            id: EntityId::new(),
            relation: relation.trim().to_owned(),
            condition: condition.trim().to_owned(),
        });
        Ok(HistoryChange::FamilyMembers(members))
    }

    pub fn remove_family_member(&self, id: EntityId) -> EditorResult<HistoryChange> {
        without(&self.slice.family_members, id, SectionId::History)
            .map(HistoryChange::FamilyMembers)
    }

    /// Adds a symptom tag. Adding a tag that is already present leaves the list as it is.
    pub fn add_symptom_tag(&self, tag: &str) -> EditorResult<HistoryChange> {
        let tag = normalise_entry(tag).ok_or(EditorError::BlankEntry("symptom tag"))?;
        let mut tags = self.slice.symptom_tags.clone();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        Ok(HistoryChange::SymptomTags(tags))
    }

    pub fn remove_symptom_tag(&self, tag: &str) -> HistoryChange {
        let tag = tag.trim();
        HistoryChange::SymptomTags(
            self.slice
                .symptom_tags
                .iter()
                .filter(|existing| existing.as_str() != tag)
                .cloned()
                .collect(),
        )
    }

    pub fn set_social_history(&self, social: SocialHistory) -> HistoryChange {
        HistoryChange::SocialHistory(social)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_members_are_appended_and_removed_by_id() {
        let slice = HistorySlice::default();
        let slice = slice.clone().with_change(
            HistoryEditor::new(&slice)
                .add_family_member("father", "hypertension")
                .unwrap(),
        );
        let slice = slice.clone().with_change(
            HistoryEditor::new(&slice)
                .add_family_member("mother", "diabetes")
                .unwrap(),
        );
        assert_eq!(slice.family_members.len(), 2);

        let father = slice.family_members[0].id;
        let next = slice
            .clone()
            .with_change(HistoryEditor::new(&slice).remove_family_member(father).unwrap());
        assert_eq!(next.family_members.len(), 1);
        assert_eq!(next.family_members[0].relation, "mother");

        let err = HistoryEditor::new(&next)
            .remove_family_member(father)
            .unwrap_err();
        assert!(matches!(err, EditorError::UnknownId { section: SectionId::History, .. }));
    }

    #[test]
    fn symptom_tags_are_trimmed_and_deduplicated() {
        let slice = HistorySlice {
            symptom_tags: vec!["fever".into()],
            ..HistorySlice::default()
        };
        let editor = HistoryEditor::new(&slice);

        assert_eq!(
            editor.add_symptom_tag("  cough ").unwrap(),
            HistoryChange::SymptomTags(vec!["fever".into(), "cough".into()])
        );
        assert_eq!(
            editor.add_symptom_tag("fever").unwrap(),
            HistoryChange::SymptomTags(vec!["fever".into()])
        );
        assert_eq!(
            editor.add_symptom_tag("   ").unwrap_err(),
            EditorError::BlankEntry("symptom tag")
        );
        assert_eq!(
            editor.remove_symptom_tag("fever"),
            HistoryChange::SymptomTags(vec![])
        );
    }

    #[test]
    fn blank_relation_is_rejected() {
        let slice = HistorySlice::default();
        assert_eq!(
            HistoryEditor::new(&slice)
                .add_family_member(" ", "asthma")
                .unwrap_err(),
            EditorError::BlankEntry("relation")
        );
    }
}
