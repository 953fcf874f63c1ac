//! Advisory precondition guards for project mutations.
//!
//! Every guard is a pure function over the locally cached record. When the
//! cache has no copy of the project the guard allows the call and the
//! server decides: these checks save a round trip and give an immediate
//! reason, they are not a security boundary.

use crate::error::{IfarmError, Result};

use super::model::{Project, ProjectPatch};
use super::status::ProjectStatus;

/// Fields that are frozen once a project leaves `Draft`.
const RESTRICTED_AFTER_PUBLISH: &str = "已发布的项目不能修改地块、作物、认养单位数量和价格";

/// Whether an update may be issued.
///
/// From `Published` onward the plot, crop, unit count, and unit price are
/// frozen; a patch that changes any of them is rejected.
pub fn check_can_update(project: Option<&Project>, patch: &ProjectPatch) -> Result<()> {
    let Some(project) = project else {
        return Ok(());
    };

    if project.project_status >= ProjectStatus::Published {
        let restricted_change = patch.plot_id.is_some_and(|v| v != project.plot_id)
            || patch.crop_id.is_some_and(|v| v != project.crop_id)
            || patch.unit_count.is_some_and(|v| v != project.unit_count)
            || patch.unit_price.is_some_and(|v| v != project.unit_price);

        if restricted_change {
            return Err(IfarmError::precondition(RESTRICTED_AFTER_PUBLISH));
        }
    }

    Ok(())
}

/// Whether the project may be deleted.
///
/// Projects with orders, or in an in-flight phase, must be cancelled first.
pub fn check_can_delete(project: Option<&Project>) -> Result<()> {
    let Some(project) = project else {
        return Ok(());
    };

    if project.order_count > 0 {
        return Err(IfarmError::precondition(format!(
            "项目下还有 {} 个订单，无法删除",
            project.order_count
        )));
    }

    if project.project_status.is_active() {
        return Err(IfarmError::precondition("进行中的项目无法删除，请先取消项目"));
    }

    Ok(())
}

/// Whether the project may move to `next` per the transition table.
pub fn check_status_can_update(project: Option<&Project>, next: ProjectStatus) -> Result<()> {
    let Some(project) = project else {
        return Ok(());
    };

    let current = project.project_status;
    if !current.can_transition_to(next) {
        return Err(IfarmError::precondition(format!(
            "不能从{}状态变更为{}状态",
            current.name(),
            next.name()
        )));
    }

    Ok(())
}

/// Whether the project carries everything a published listing needs.
pub fn check_can_publish(project: Option<&Project>) -> Result<()> {
    let Some(project) = project else {
        return Ok(());
    };

    if project.cover_image.as_deref().is_none_or(str::is_empty) {
        return Err(IfarmError::precondition("请先上传项目封面图片"));
    }

    let description_len = project
        .description
        .as_deref()
        .map_or(0, |d| d.chars().count());
    if description_len < 10 {
        return Err(IfarmError::precondition("请完善项目描述（至少10个字符）"));
    }

    if project.unit_count == 0 {
        return Err(IfarmError::precondition("请设置认养单位数量"));
    }

    if project.unit_price <= 0.0 {
        return Err(IfarmError::precondition("请设置认养单位价格"));
    }

    Ok(())
}

/// Whether the project may be cancelled (terminal statuses may not).
pub fn check_can_cancel(project: Option<&Project>) -> Result<()> {
    let Some(project) = project else {
        return Ok(());
    };

    match project.project_status {
        ProjectStatus::Completed => Err(IfarmError::precondition("已完成的项目无法取消")),
        ProjectStatus::Cancelled => Err(IfarmError::precondition("项目已经是取消状态")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn project(status: ProjectStatus) -> Project {
        Project {
            id: 1,
            name: "测试项目".to_string(),
            description: Some("一段足够长的项目描述文字".to_string()),
            farm_id: 1,
            plot_id: 10,
            crop_id: 20,
            unit_count: 50,
            unit_price: 99.0,
            unit_area: Some(10.0),
            cover_image: Some("cover.png".to_string()),
            order_count: 0,
            project_status: status,
            enabled: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_absent_cache_allows_everything() {
        assert!(check_can_update(None, &ProjectPatch::default()).is_ok());
        assert!(check_can_delete(None).is_ok());
        assert!(check_status_can_update(None, ProjectStatus::Completed).is_ok());
        assert!(check_can_publish(None).is_ok());
        assert!(check_can_cancel(None).is_ok());
    }

    #[test]
    fn test_update_frozen_fields_after_publish() {
        let p = project(ProjectStatus::Published);
        let patch = ProjectPatch {
            unit_price: Some(120.0),
            ..Default::default()
        };
        let err = check_can_update(Some(&p), &patch).unwrap_err();
        assert!(err.to_string().contains("已发布"));

        // Same value is not a change.
        let same = ProjectPatch {
            unit_price: Some(99.0),
            ..Default::default()
        };
        assert!(check_can_update(Some(&p), &same).is_ok());

        // Draft projects may change anything.
        let draft = project(ProjectStatus::Draft);
        assert!(check_can_update(Some(&draft), &patch).is_ok());

        // Unrestricted fields stay editable after publish.
        let rename = ProjectPatch {
            name: Some("新名字".to_string()),
            ..Default::default()
        };
        assert!(check_can_update(Some(&p), &rename).is_ok());
    }

    #[test]
    fn test_delete_blocked_by_orders_and_active_status() {
        let mut p = project(ProjectStatus::Draft);
        p.order_count = 3;
        let err = check_can_delete(Some(&p)).unwrap_err();
        assert!(err.to_string().contains("3 个订单"));

        for status in [
            ProjectStatus::Adopting,
            ProjectStatus::Planting,
            ProjectStatus::Harvesting,
        ] {
            let active = project(status);
            assert!(check_can_delete(Some(&active)).is_err(), "{status:?}");
        }

        for status in [
            ProjectStatus::Draft,
            ProjectStatus::Published,
            ProjectStatus::Completed,
            ProjectStatus::Cancelled,
        ] {
            let inactive = project(status);
            assert!(check_can_delete(Some(&inactive)).is_ok(), "{status:?}");
        }
    }

    #[test]
    fn test_status_guard_follows_transition_table() {
        for from in ProjectStatus::iter() {
            let p = project(from);
            for to in ProjectStatus::iter() {
                let result = check_status_can_update(Some(&p), to);
                if from.can_transition_to(to) {
                    assert!(result.is_ok(), "{from:?} -> {to:?}");
                } else {
                    let err = result.unwrap_err();
                    assert!(
                        err.to_string().contains(from.name()),
                        "reason names the current status: {err}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_publish_preconditions() {
        let ok = project(ProjectStatus::Draft);
        assert!(check_can_publish(Some(&ok)).is_ok());

        let mut no_cover = ok.clone();
        no_cover.cover_image = None;
        assert!(check_can_publish(Some(&no_cover)).is_err());

        let mut short_description = ok.clone();
        short_description.description = Some("太短".to_string());
        assert!(check_can_publish(Some(&short_description)).is_err());

        let mut no_units = ok.clone();
        no_units.unit_count = 0;
        assert!(check_can_publish(Some(&no_units)).is_err());

        let mut free = ok.clone();
        free.unit_price = 0.0;
        assert!(check_can_publish(Some(&free)).is_err());
    }

    #[test]
    fn test_cancel_rejected_for_terminal_statuses() {
        let completed = project(ProjectStatus::Completed);
        let err = check_can_cancel(Some(&completed)).unwrap_err();
        assert_eq!(err.to_string(), "已完成的项目无法取消");

        let cancelled = project(ProjectStatus::Cancelled);
        assert!(check_can_cancel(Some(&cancelled)).is_err());

        let planting = project(ProjectStatus::Planting);
        assert!(check_can_cancel(Some(&planting)).is_ok());
    }
}
