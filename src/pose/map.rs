use super::joint::{JointId, JointSample};

/// 関節名から検出値への部分マッピング
///
/// 生の検出結果 (フレームごとに検出器が返すもの) とマージ済み
/// スナップショットの両方に使う。未検出の関節はエントリなしで、
/// 参照は Option を返す。
#[derive(Debug, Clone, PartialEq)]
pub struct JointMap {
    slots: [Option<JointSample>; JointId::COUNT],
}

impl JointMap {
    pub fn new() -> Self {
        Self {
            slots: [None; JointId::COUNT],
        }
    }

    pub fn insert(&mut self, id: JointId, sample: JointSample) {
        self.slots[id as usize] = Some(sample);
    }

    pub fn get(&self, id: JointId) -> Option<&JointSample> {
        self.slots[id as usize].as_ref()
    }

    pub fn remove(&mut self, id: JointId) -> Option<JointSample> {
        self.slots[id as usize].take()
    }

    pub fn contains(&self, id: JointId) -> bool {
        self.slots[id as usize].is_some()
    }

    /// 登録済み関節数
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    pub fn clear(&mut self) {
        self.slots = [None; JointId::COUNT];
    }

    /// 登録済み関節をインデックス順に列挙する
    pub fn iter(&self) -> impl Iterator<Item = (JointId, &JointSample)> + '_ {
        JointId::ALL
            .iter()
            .filter_map(move |&id| self.get(id).map(|sample| (id, sample)))
    }
}

impl Default for JointMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_empty() {
        let map = JointMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert!(map.get(JointId::Nose).is_none());
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = JointMap::new();
        map.insert(JointId::LeftElbow, JointSample::new(0.4, 0.5, 0.9));

        let sample = map.get(JointId::LeftElbow).unwrap();
        assert_eq!(sample.x, 0.4);
        assert_eq!(sample.y, 0.5);
        assert_eq!(sample.confidence, 0.9);
        assert!(map.contains(JointId::LeftElbow));
        assert!(!map.contains(JointId::RightElbow));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut map = JointMap::new();
        map.insert(JointId::Nose, JointSample::new(0.1, 0.1, 0.5));
        map.insert(JointId::Nose, JointSample::new(0.2, 0.3, 0.8));

        let sample = map.get(JointId::Nose).unwrap();
        assert_eq!(sample.x, 0.2);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut map = JointMap::new();
        map.insert(JointId::LeftWrist, JointSample::new(0.3, 0.6, 0.7));

        let removed = map.remove(JointId::LeftWrist);
        assert!(removed.is_some());
        assert!(map.get(JointId::LeftWrist).is_none());
        assert!(map.remove(JointId::LeftWrist).is_none());
    }

    #[test]
    fn test_iter_in_index_order() {
        let mut map = JointMap::new();
        map.insert(JointId::RightWrist, JointSample::new(0.7, 0.6, 0.9));
        map.insert(JointId::Nose, JointSample::new(0.5, 0.2, 0.9));
        map.insert(JointId::LeftShoulder, JointSample::new(0.4, 0.3, 0.9));

        let ids: Vec<JointId> = map.iter().map(|(id, _)| id).collect();
        assert_eq!(
            ids,
            vec![JointId::Nose, JointId::LeftShoulder, JointId::RightWrist]
        );
    }

    #[test]
    fn test_clear() {
        let mut map = JointMap::new();
        map.insert(JointId::LeftKnee, JointSample::new(0.4, 0.7, 0.9));
        map.clear();
        assert!(map.is_empty());
    }
}
