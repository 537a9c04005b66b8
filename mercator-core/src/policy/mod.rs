//! Site access policy shared by every mapping and primary-domain handler.
//!
//! A caller may act on a site when they are a network super-admin, or when they
//! hold `manage_options` on their current site and belong to the target site.

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::repository::IdentityRepository;
use crate::state::HasServices;

pub type PolicyResult<T> = std::result::Result<T, AppError>;

/// Capability required to manage a site's domains
pub const MANAGE_OPTIONS: &str = "manage_options";

/// Facts about a caller gathered before deciding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteGrants {
    pub super_admin: bool,
    /// `manage_options` on the caller's current site
    pub has_capability: bool,
    /// Sites the caller is a member of
    pub sites: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    MissingCapability,
    NotMember,
}

impl Denial {
    fn message(self) -> &'static str {
        match self {
            Denial::MissingCapability => "Sorry, you are not allowed to manage domains",
            Denial::NotMember => "Sorry, you are not allowed to manage this site",
        }
    }
}

/// Pure access decision over gathered grants.
pub fn evaluate_site_access(grants: &SiteGrants, site_id: i64) -> Result<(), Denial> {
    if grants.super_admin {
        return Ok(());
    }
    if !grants.has_capability {
        return Err(Denial::MissingCapability);
    }
    if !grants.sites.contains(&site_id) {
        return Err(Denial::NotMember);
    }
    Ok(())
}

async fn gather_grants<S: HasServices>(state: &S, auth: &AuthUser) -> PolicyResult<SiteGrants> {
    let identity = state.identity_repo();

    if state.config().is_super_admin_email(&auth.email)
        || identity.is_network_super_admin(auth.user_id).await?
    {
        return Ok(SiteGrants {
            super_admin: true,
            ..Default::default()
        });
    }

    let has_capability = identity
        .user_has_capability(auth.user_id, auth.current_site_id, MANAGE_OPTIONS)
        .await?;
    // Membership only matters once the capability check passes
    let sites = if has_capability {
        identity.sites_of_user(auth.user_id).await?
    } else {
        Vec::new()
    };

    Ok(SiteGrants {
        super_admin: false,
        has_capability,
        sites,
    })
}

/// Authorize `auth` against `site_id`, failing with 403 when denied.
pub async fn check_site_access<S: HasServices>(
    state: &S,
    auth: &AuthUser,
    site_id: i64,
) -> PolicyResult<()> {
    let grants = gather_grants(state, auth).await?;

    evaluate_site_access(&grants, site_id).map_err(|denial| {
        tracing::warn!(
            user_id = auth.user_id,
            site_id,
            current_site_id = auth.current_site_id,
            reason = ?denial,
            "Site access denied"
        );
        AppError::Forbidden(denial.message().to_string())
    })
}
