//! Closed role and section enumerations.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Job-function identity of an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Physician.
    Doctor,
    Nurse,
    DepartmentHead,
    /// Hospital administrator.
    Admin,
    Cashier,
    Pharmacist,
    /// Laboratory / imaging technician.
    Technician,
    /// Registration and reception desk.
    FrontDesk,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Doctor,
        Role::Nurse,
        Role::DepartmentHead,
        Role::Admin,
        Role::Cashier,
        Role::Pharmacist,
        Role::Technician,
        Role::FrontDesk,
        Role::SuperAdmin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::DepartmentHead => "department-head",
            Role::Admin => "admin",
            Role::Cashier => "cashier",
            Role::Pharmacist => "pharmacist",
            Role::Technician => "technician",
            Role::FrontDesk => "front-desk",
            Role::SuperAdmin => "super-admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_owned()))
    }
}

/// A navigable capability area of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Dashboard,
    /// Patient registry.
    Patients,
    Appointments,
    /// Clinical records browser.
    MedicalRecords,
    Consultation,
    Queue,
    Inpatients,
    Wards,
    Beds,
    Departments,
    Staff,
    Schedules,
    Pharmacy,
    Laboratory,
    Billing,
    Settings,
}

impl Section {
    /// All sections in navigation-menu order.
    pub const ALL: [Section; 16] = [
        Section::Dashboard,
        Section::Patients,
        Section::Appointments,
        Section::MedicalRecords,
        Section::Consultation,
        Section::Queue,
        Section::Inpatients,
        Section::Wards,
        Section::Beds,
        Section::Departments,
        Section::Staff,
        Section::Schedules,
        Section::Pharmacy,
        Section::Laboratory,
        Section::Billing,
        Section::Settings,
    ];

    /// Route path segment for the section.
    pub fn path(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Patients => "patients",
            Section::Appointments => "appointments",
            Section::MedicalRecords => "medical-records",
            Section::Consultation => "consultation",
            Section::Queue => "queue",
            Section::Inpatients => "inpatients",
            Section::Wards => "wards",
            Section::Beds => "beds",
            Section::Departments => "departments",
            Section::Staff => "staff",
            Section::Schedules => "schedules",
            Section::Pharmacy => "pharmacy",
            Section::Laboratory => "laboratory",
            Section::Billing => "billing",
            Section::Settings => "settings",
        }
    }

    /// Menu label key. Localised strings are looked up by the front end.
    pub fn label_key(self) -> &'static str {
        match self {
            Section::Dashboard => "nav.dashboard",
            Section::Patients => "nav.patients",
            Section::Appointments => "nav.appointments",
            Section::MedicalRecords => "nav.medicalRecords",
            Section::Consultation => "nav.consultation",
            Section::Queue => "nav.queue",
            Section::Inpatients => "nav.inpatients",
            Section::Wards => "nav.wards",
            Section::Beds => "nav.beds",
            Section::Departments => "nav.departments",
            Section::Staff => "nav.staff",
            Section::Schedules => "nav.schedules",
            Section::Pharmacy => "nav.pharmacy",
            Section::Laboratory => "nav.laboratory",
            Section::Billing => "nav.billing",
            Section::Settings => "nav.settings",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Section {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.path() == s)
            .ok_or_else(|| UnknownTag(s.to_owned()))
    }
}

/// A role or section tag that is not part of the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag: '{0}'")]
pub struct UnknownTag(pub String);
