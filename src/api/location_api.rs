// ==========================================
// 仓储库位分配系统 - 库位查询 API
// ==========================================
// 职责: 库位登记与平面图/网格只读查询,供任意传输层展示
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::location::StorageLocation;
use crate::engine::grid::LocationGrid;
use crate::repository::LocationRepository;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// LocationApi - 库位查询 API
// ==========================================
pub struct LocationApi {
    location_repo: Arc<LocationRepository>,
}

impl LocationApi {
    /// 创建库位查询 API 实例
    pub fn new(location_repo: Arc<LocationRepository>) -> Self {
        Self { location_repo }
    }

    /// 登记库位 (坐标四元组唯一,初始无占用)
    #[instrument(skip(self, location), fields(location_id = %location.location_id))]
    pub fn register_location(&self, location: &StorageLocation) -> ApiResult<()> {
        if location.occupant_count != 0 || location.assigned_item_id.is_some() {
            return Err(ApiError::InvalidInput(
                "登记库位必须无占用,占用只能经上架事务写入".to_string(),
            ));
        }
        self.location_repo.insert(location)?;
        Ok(())
    }

    /// 库位全量列表 (按坐标排序)
    pub fn list_locations(&self) -> ApiResult<Vec<StorageLocation>> {
        Ok(self.location_repo.find_all()?)
    }

    /// 从当前快照构建网格 (每次调用重建,网格不持有可变状态)
    pub fn get_grid(&self) -> ApiResult<LocationGrid> {
        let locations = self.location_repo.find_all()?;
        Ok(LocationGrid::build(&locations))
    }

    /// 区代码列表
    pub fn list_zones(&self) -> ApiResult<Vec<String>> {
        let grid = self.get_grid()?;
        Ok(grid.zone_codes().into_iter().map(String::from).collect())
    }
}
