//! The static section → roles table.

use crate::{Role, Section};

/// Static mapping from each [`Section`] to the roles permitted to enter it.
///
/// This is a zero-sized type used for namespacing; all functions are associated functions.
/// The table is total over `Section` and fixed at compile time.
pub struct RoutePolicy;

impl RoutePolicy {
    /// The allow-list for `section`.
    pub fn allowed_roles(section: Section) -> &'static [Role] {
        use Role::*;

        match section {
            Section::Dashboard => &[
                Doctor,
                Nurse,
                DepartmentHead,
                Admin,
                Cashier,
                Pharmacist,
                Technician,
                FrontDesk,
                SuperAdmin,
            ],
            Section::Patients => &[Doctor, Nurse, DepartmentHead, Admin, FrontDesk, SuperAdmin],
            Section::Appointments => &[Doctor, Nurse, DepartmentHead, Admin, FrontDesk, SuperAdmin],
            Section::MedicalRecords => &[Doctor, Nurse, DepartmentHead, SuperAdmin],
            Section::Consultation => &[Doctor, DepartmentHead, SuperAdmin],
            Section::Queue => &[Doctor, Nurse, DepartmentHead, FrontDesk, SuperAdmin],
            Section::Inpatients => &[Doctor, Nurse, DepartmentHead, SuperAdmin],
            Section::Wards => &[Nurse, DepartmentHead, Admin, SuperAdmin],
            Section::Beds => &[Nurse, DepartmentHead, Admin, SuperAdmin],
            Section::Departments => &[DepartmentHead, Admin, SuperAdmin],
            Section::Staff => &[DepartmentHead, Admin, SuperAdmin],
            Section::Schedules => &[Doctor, Nurse, DepartmentHead, Admin, SuperAdmin],
            Section::Pharmacy => &[Doctor, Pharmacist, SuperAdmin],
            Section::Laboratory => &[Doctor, Technician, SuperAdmin],
            Section::Billing => &[Cashier, FrontDesk, Admin, SuperAdmin],
            Section::Settings => &[Admin, SuperAdmin],
        }
    }

    /// Whether `role` may enter `section`. Deterministic and side-effect free.
    pub fn can_access(role: Role, section: Section) -> bool {
        Self::allowed_roles(section).contains(&role)
    }

    /// Every section `role` may enter, in menu order.
    pub fn sections_for(role: Role) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| Self::can_access(role, *section))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_SECTION;

    #[test]
    fn every_role_can_reach_the_default_section() {
        for role in Role::ALL {
            assert!(
                RoutePolicy::can_access(role, DEFAULT_SECTION),
                "{role} must be able to land on the redirect target"
            );
        }
    }

    #[test]
    fn allow_lists_have_no_duplicates() {
        for section in Section::ALL {
            let roles = RoutePolicy::allowed_roles(section);
            let mut sorted = roles.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), roles.len(), "duplicate role in {section}");
        }
    }

    #[test]
    fn can_access_matches_sections_for_over_whole_space() {
        for role in Role::ALL {
            let allowed = RoutePolicy::sections_for(role);
            for section in Section::ALL {
                assert_eq!(
                    RoutePolicy::can_access(role, section),
                    allowed.contains(&section),
                    "{role} / {section}"
                );
            }
        }
    }

    #[test]
    fn consultation_is_clinical_only() {
        assert!(RoutePolicy::can_access(Role::Doctor, Section::Consultation));
        assert!(RoutePolicy::can_access(Role::DepartmentHead, Section::Consultation));
        assert!(!RoutePolicy::can_access(Role::Cashier, Section::Consultation));
        assert!(!RoutePolicy::can_access(Role::FrontDesk, Section::Consultation));
        assert!(!RoutePolicy::can_access(Role::Pharmacist, Section::Consultation));
    }

    #[test]
    fn super_admin_reaches_everything() {
        assert_eq!(RoutePolicy::sections_for(Role::SuperAdmin), Section::ALL.to_vec());
    }

    #[test]
    fn cashier_sees_only_dashboard_and_billing() {
        assert_eq!(
            RoutePolicy::sections_for(Role::Cashier),
            vec![Section::Dashboard, Section::Billing]
        );
    }
}
