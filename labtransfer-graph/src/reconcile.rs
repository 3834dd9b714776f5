//! Membership hierarchy reconciliation.
//!
//! A person's service memberships (in an organization that does not
//! employ) get their super-organization from one of the person's employer
//! memberships. An employer membership used this way is absorbed: the
//! service membership's super-organization link now carries the same fact.

use labtransfer_model::Membership;
use labtransfer_types::DbId;

/// One provisionally built membership of a person.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    pub membership: Membership,
    /// The direct organization's type denotes an employer.
    pub employer: bool,
    /// Caller data carried through unchanged.
    pub tag: T,
}

/// Outcome for one person.
#[derive(Debug)]
pub struct Reconciled<T> {
    /// Service memberships in input order, possibly with a new
    /// super-organization.
    pub services: Vec<Candidate<T>>,
    /// Employer memberships to persist standalone.
    pub employers: Vec<Candidate<T>>,
    /// Employer memberships implied by a service membership.
    pub absorbed: Vec<Candidate<T>>,
}

impl<T> Reconciled<T> {
    /// Memberships to persist, services first.
    pub fn persisted(&self) -> impl Iterator<Item = &Candidate<T>> {
        self.services.iter().chain(&self.employers)
    }
}

/// Reconciles the memberships of one person. `is_super_of(child, parent)`
/// tells whether `parent` is registered as a super-organization of
/// `child`.
pub fn reconcile<T, F>(candidates: Vec<Candidate<T>>, is_super_of: F) -> Reconciled<T>
where
    F: Fn(DbId, DbId) -> bool,
{
    let (mut services, employers): (Vec<_>, Vec<_>) =
        candidates.into_iter().partition(|c| !c.employer);
    let mut used = vec![false; employers.len()];

    for service in services.iter_mut().filter(|s| s.membership.super_organization.is_none()) {
        let Some(service_org) = service.membership.organization else {
            continue;
        };
        let found = employers.iter().position(|employer| {
            employer.membership.organization.is_some_and(|employer_org| {
                is_super_of(service_org, employer_org)
                    && employer.membership.contains_interval_of(&service.membership)
            })
        });
        if let Some(index) = found {
            service.membership.super_organization = employers[index].membership.organization;
            used[index] = true;
        }
    }

    let mut kept = Vec::new();
    let mut absorbed = Vec::new();
    for (employer, used) in employers.into_iter().zip(used) {
        if used {
            absorbed.push(employer);
        } else {
            kept.push(employer);
        }
    }
    Reconciled {
        services,
        employers: kept,
        absorbed,
    }
}
