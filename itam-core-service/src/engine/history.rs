use itam_core_db::models::{AssetModel, ComponentModel, ComputerModel};
use uuid::Uuid;

/// An item with an owner slot and an append-only history trail
pub trait OwnedItem {
    fn owner_id(&self) -> Option<Uuid>;

    fn set_owner(&mut self, owner_id: Option<Uuid>);

    fn history_mut(&mut self) -> &mut Vec<Uuid>;
}

impl OwnedItem for AssetModel {
    fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }

    fn set_owner(&mut self, owner_id: Option<Uuid>) {
        self.owner_id = owner_id;
    }

    fn history_mut(&mut self) -> &mut Vec<Uuid> {
        &mut self.history
    }
}

impl OwnedItem for ComputerModel {
    fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }

    fn set_owner(&mut self, owner_id: Option<Uuid>) {
        self.owner_id = owner_id;
    }

    fn history_mut(&mut self) -> &mut Vec<Uuid> {
        &mut self.history
    }
}

impl OwnedItem for ComponentModel {
    fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }

    fn set_owner(&mut self, owner_id: Option<Uuid>) {
        self.owner_id = owner_id;
    }

    fn history_mut(&mut self) -> &mut Vec<Uuid> {
        &mut self.history
    }
}

/// Appends the outgoing owner or host; never deduplicates
pub fn record_history<T: OwnedItem>(item: &mut T, outgoing: Uuid) {
    item.history_mut().push(outgoing);
}

/// Adds a host to an asset's provenance trail unless it is already there
pub fn record_root_history(asset: &mut AssetModel, host_id: Uuid) {
    if !asset.root_history.contains(&host_id) {
        asset.root_history.push(host_id);
    }
}

/// Moves the current owner into history, then vacates the item
///
/// Returns the former owner. A vacant item is left unchanged.
pub fn clear_owner<T: OwnedItem>(item: &mut T) -> Option<Uuid> {
    let previous = item.owner_id();
    if let Some(owner_id) = previous {
        record_history(item, owner_id);
        item.set_owner(None);
    }
    previous
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{new_asset, new_component};
    use itam_core_api::ComponentType;

    #[test]
    fn test_clear_owner_appends_before_clearing() {
        let owner = Uuid::new_v4();
        let mut asset = new_asset("BC-H1");
        asset.owner_id = Some(owner);
        asset.history.push(owner);

        assert_eq!(clear_owner(&mut asset), Some(owner));
        assert_eq!(asset.owner_id, None);
        assert_eq!(asset.history, vec![owner, owner]);

        assert_eq!(clear_owner(&mut asset), None);
        assert_eq!(asset.history.len(), 2);
    }

    #[test]
    fn test_root_history_is_a_set() {
        let host = Uuid::new_v4();
        let mut asset = new_asset("BC-H2");
        record_root_history(&mut asset, host);
        record_root_history(&mut asset, host);
        assert_eq!(asset.root_history, vec![host]);

        let mut component = new_component("UID-001", ComponentType::Ram);
        record_history(&mut component, host);
        record_history(&mut component, host);
        assert_eq!(component.history, vec![host, host]);
    }
}
