//! Enumerations written to documents by their constant name.

/// An enumeration written as its upper-case constant name and read back
/// case-insensitively.
pub trait Labeled: Sized + Copy + Default + PartialEq + 'static {
    const VARIANTS: &'static [Self];

    fn label(self) -> &'static str;

    /// Parses a constant name. A blank value selects the default member.
    fn parse_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(Self::default());
        }
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(raw))
    }
}

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident default $default:ident {
            $( $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $variant ),+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $crate::Labeled for $name {
            const VARIANTS: &'static [Self] = &[$( Self::$variant ),+];

            fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::Labeled::label(*self))
            }
        }
    };
}

labeled_enum! {
    /// Category of a research organization.
    ResearchOrganizationType default Laboratory {
        ResearchTeam => "RESEARCH_TEAM",
        LaboratoryDepartment => "LABORATORY_DEPARTMENT",
        Laboratory => "LABORATORY",
        Faculty => "FACULTY",
        University => "UNIVERSITY",
        HighSchool => "HIGH_SCHOOL",
        Community => "COMMUNITY",
        Other => "OTHER",
    }
}

impl ResearchOrganizationType {
    /// Organizations of these types employ people; memberships to any
    /// other type describe a service inside an employer.
    #[must_use]
    pub const fn is_employer(self) -> bool {
        matches!(self, Self::University | Self::HighSchool | Self::Community)
    }
}

labeled_enum! {
    Gender default NotSpecified {
        NotSpecified => "NOT_SPECIFIED",
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
    }
}

labeled_enum! {
    MemberStatus default Other {
        FullProfessor => "FULL_PROFESSOR",
        AssociateProfessor => "ASSOCIATE_PROFESSOR",
        Researcher => "RESEARCHER",
        ResearchEngineer => "RESEARCH_ENGINEER",
        Engineer => "ENGINEER",
        Postdoc => "POSTDOC",
        PhdStudent => "PHD_STUDENT",
        MasterStudent => "MASTER_STUDENT",
        AdministrativeStaff => "ADMIN",
        AssociatedMember => "ASSOCIATED_MEMBER",
        Other => "OTHER",
    }
}

labeled_enum! {
    Language default English {
        English => "ENGLISH",
        French => "FRENCH",
        German => "GERMAN",
        Italian => "ITALIAN",
        Spanish => "SPANISH",
        Portuguese => "PORTUGUESE",
        Chinese => "CHINESE",
        Other => "OTHER",
    }
}

labeled_enum! {
    /// Journal quartile, as published by Scimago or Web of Science.
    QuartileRanking default NotRanked {
        Q1 => "Q1",
        Q2 => "Q2",
        Q3 => "Q3",
        Q4 => "Q4",
        NotRanked => "NR",
    }
}

labeled_enum! {
    CoreRanking default NotRanked {
        AStar => "A_STAR",
        A => "A",
        B => "B",
        C => "C",
        NotRanked => "NR",
    }
}

labeled_enum! {
    JuryMembershipType default Examiner {
        President => "PRESIDENT",
        Reviewer => "REVIEWER",
        Examiner => "EXAMINER",
        InvitedPerson => "INVITED_PERSON",
    }
}

labeled_enum! {
    DefenseType default Phd {
        Hdr => "HDR",
        Phd => "PHD",
        Master => "MASTER",
    }
}

labeled_enum! {
    SupervisorType default Supervisor {
        Director => "DIRECTOR",
        CoDirector => "CO_DIRECTOR",
        Supervisor => "SUPERVISOR",
        Advisor => "ADVISOR",
    }
}

labeled_enum! {
    FundingScheme default NotFunded {
        NotFunded => "NOT_FUNDED",
        Europe => "EU",
        Anr => "ANR",
        Region => "REGION",
        Government => "FRENCH_GOVERNMENT",
        University => "UNIVERSITY",
        Company => "COMPANY",
        Other => "OTHER",
    }
}

labeled_enum! {
    InvitationType default IncomingGuest {
        IncomingGuest => "INCOMING_GUEST",
        OutgoingGuest => "OUTGOING_GUEST",
        IncomingGuestProfessor => "INCOMING_GUEST_PROFESSOR",
        OutgoingGuestProfessor => "OUTGOING_GUEST_PROFESSOR",
    }
}

labeled_enum! {
    ProjectStatus default Accepted {
        Preparation => "PREPARATION",
        Evaluation => "EVALUATION",
        Accepted => "ACCEPTED",
        Rejected => "REJECTED",
        Cancelled => "CANCELLED",
    }
}

labeled_enum! {
    ProjectActivityType default AppliedResearch {
        FundamentalResearch => "FUNDAMENTAL_RESEARCH",
        AppliedResearch => "APPLIED_RESEARCH",
        ExperimentalDevelopment => "EXPERIMENTAL_DEVELOPMENT",
    }
}

labeled_enum! {
    ProjectContractType default NotSpecified {
        Rco => "RCO",
        Pi => "PI",
        Pr => "PR",
        Ap => "AP",
        NotSpecified => "NOT_SPECIFIED",
    }
}

labeled_enum! {
    /// Technology readiness level.
    Trl default Trl1 {
        Trl1 => "TRL1",
        Trl2 => "TRL2",
        Trl3 => "TRL3",
        Trl4 => "TRL4",
        Trl5 => "TRL5",
        Trl6 => "TRL6",
        Trl7 => "TRL7",
        Trl8 => "TRL8",
        Trl9 => "TRL9",
    }
}

labeled_enum! {
    ParticipantRole default Participant {
        Participant => "PARTICIPANT",
        ScientificHead => "SCIENTIFIC_HEAD",
        ProjectCoordinator => "PROJECT_COORDINATOR",
        WorkPackageLeader => "WORK_PACKAGE_LEADER",
        TaskLeader => "TASK_LEADER",
    }
}

labeled_enum! {
    AssociatedStructureType default Other {
        Enterprise => "ENTERPRISE",
        ResearchInstitute => "RESEARCH_INSTITUTE",
        InternationalResearchGroup => "INTERNATIONAL_RESEARCH_GROUP",
        NationalResearchGroup => "NATIONAL_RESEARCH_GROUP",
        ResearchNetwork => "RESEARCH_NETWORK",
        Other => "OTHER",
    }
}

labeled_enum! {
    HolderRole default Member {
        Creator => "CREATOR",
        Head => "HEAD",
        ScientificHead => "SCIENTIFIC_HEAD",
        Member => "MEMBER",
    }
}

labeled_enum! {
    TeachingActivityLevel default Master {
        HighSchool => "HIGH_SCHOOL",
        Bachelor => "BACHELOR",
        Master => "MASTER",
        Doctoral => "DOCTORAL",
    }
}

labeled_enum! {
    StudentType default InitialTraining {
        InitialTraining => "INITIAL_TRAINING",
        Apprenticeship => "APPRENTICESHIP",
        ContinuousTraining => "CONTINUOUS_TRAINING",
    }
}

labeled_enum! {
    TeachingRole default Lecturer {
        Lecturer => "LECTURER",
        Supervisor => "SUPERVISOR",
        Responsible => "RESPONSIBLE",
    }
}

labeled_enum! {
    TeachingActivityType default Lecture {
        Lecture => "LECTURE",
        Tutorial => "TUTORIAL",
        PracticalWork => "PRACTICAL_WORK",
        IntegratedCourse => "INTEGRATED_COURSE",
        Other => "OTHER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Gender::parse_label("female"), Some(Gender::Female));
        assert_eq!(Gender::parse_label(" MALE "), Some(Gender::Male));
    }

    #[test]
    fn blank_selects_default() {
        assert_eq!(FundingScheme::parse_label(""), Some(FundingScheme::NotFunded));
        assert_eq!(MemberStatus::parse_label("   "), Some(MemberStatus::Other));
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(CoreRanking::parse_label("A++"), None);
    }

    #[test]
    fn employers() {
        assert!(ResearchOrganizationType::University.is_employer());
        assert!(ResearchOrganizationType::Community.is_employer());
        assert!(!ResearchOrganizationType::ResearchTeam.is_employer());
        assert!(!ResearchOrganizationType::Laboratory.is_employer());
    }
}
