use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Цвет RGBA, компоненты в диапазоне 0..1
pub type Rgba = [f32; 4];

/// Единица длины для подписей измерений
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    /// Без единиц (только число)
    None,
    #[default]
    Meters,
    Centimeters,
    Millimeters,
    Kilometers,
    Inches,
    Feet,
    Miles,
}

impl LengthUnit {
    /// Сокращение для подписи ("" для безразмерных сцен)
    pub fn abbrev(&self) -> &'static str {
        match self {
            LengthUnit::None => "",
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
            LengthUnit::Kilometers => "km",
            LengthUnit::Inches => "in",
            LengthUnit::Feet => "ft",
            LengthUnit::Miles => "mi",
        }
    }

    /// Имя для выпадающего списка
    pub fn display_name(&self) -> &'static str {
        match self {
            LengthUnit::None => "None",
            LengthUnit::Meters => "Meters",
            LengthUnit::Centimeters => "Centimeters",
            LengthUnit::Millimeters => "Millimeters",
            LengthUnit::Kilometers => "Kilometers",
            LengthUnit::Inches => "Inches",
            LengthUnit::Feet => "Feet",
            LengthUnit::Miles => "Miles",
        }
    }

    /// Все доступные единицы
    pub fn all() -> &'static [LengthUnit] {
        &[
            LengthUnit::None,
            LengthUnit::Meters,
            LengthUnit::Centimeters,
            LengthUnit::Millimeters,
            LengthUnit::Kilometers,
            LengthUnit::Inches,
            LengthUnit::Feet,
            LengthUnit::Miles,
        ]
    }
}

/// Трансформация объекта (поворот в градусах, порядок XYZ)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Трансформация только со смещением
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

fn default_true() -> bool {
    true
}

/// Сетка объекта сцены: вершины, полигоны и свободные рёбра
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub transform: Transform,
    /// Позиции вершин в локальных координатах
    pub vertices: Vec<[f32; 3]>,
    /// Полигоны как замкнутые списки индексов вершин
    #[serde(default)]
    pub faces: Vec<Vec<u32>>,
    /// Рёбра, не принадлежащие ни одному полигону
    #[serde(default)]
    pub loose_edges: Vec<[u32; 2]>,
}

/// Описание сцены: набор сеток
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneDescription {
    pub meshes: Vec<MeshDescription>,
}

impl SceneDescription {
    /// Разобрать сцену из JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Сериализовать сцену в JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
