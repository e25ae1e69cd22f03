//! IFC class hierarchy (IFC2x3 / IFC4 / IFC4x3 union): the `IfcObject`
//! subtree, the relationship classes and the few other roots they hang from.
//! Keywords missing here still load; the model treats them as objects when
//! they fill a relationship role.
//!
//! Where schemas disagree on a supertype the IFC4 chain is used, with the
//! IFC2x3-only classes attached where IFC4 would place them.

use std::collections::HashMap;

use once_cell::sync::Lazy;

macro_rules! ifc_classes {
    (@parent None) => { None };
    (@parent $parent:ident) => { Some(IfcClass::$parent) };
    ($($name:ident => $parent:tt),* $(,)?) => {
        /// A class of the IFC schema.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum IfcClass {
            $($name),*
        }

        impl IfcClass {
            pub const ALL: &'static [IfcClass] = &[$(IfcClass::$name),*];

            /// Schema name, e.g. `IfcWallStandardCase`.
            pub fn name(self) -> &'static str {
                match self {
                    $(IfcClass::$name => stringify!($name)),*
                }
            }

            /// Direct supertype.
            pub fn parent(self) -> Option<IfcClass> {
                match self {
                    $(IfcClass::$name => ifc_classes!(@parent $parent)),*
                }
            }
        }
    };
}

ifc_classes! {
    IfcRoot => None,
    IfcObjectDefinition => IfcRoot,
    IfcPropertyDefinition => IfcRoot,
    IfcRelationship => IfcRoot,

    IfcObject => IfcObjectDefinition,
    IfcContext => IfcObjectDefinition,
    IfcTypeObject => IfcObjectDefinition,
    IfcProject => IfcContext,
    IfcProjectLibrary => IfcContext,
    IfcTypeProduct => IfcTypeObject,
    IfcElementType => IfcTypeProduct,

    IfcPropertySetDefinition => IfcPropertyDefinition,
    IfcPropertySet => IfcPropertySetDefinition,
    IfcElementQuantity => IfcPropertySetDefinition,

    // Objects that are not products
    IfcActor => IfcObject,
    IfcOccupant => IfcActor,
    IfcControl => IfcObject,
    IfcCostItem => IfcControl,
    IfcCostSchedule => IfcControl,
    IfcPermit => IfcControl,
    IfcPerformanceHistory => IfcControl,
    IfcWorkCalendar => IfcControl,
    IfcWorkControl => IfcControl,
    IfcWorkPlan => IfcWorkControl,
    IfcWorkSchedule => IfcWorkControl,
    IfcGroup => IfcObject,
    IfcAsset => IfcGroup,
    IfcInventory => IfcGroup,
    IfcStructuralLoadGroup => IfcGroup,
    IfcStructuralLoadCase => IfcStructuralLoadGroup,
    IfcStructuralResultGroup => IfcGroup,
    IfcSystem => IfcGroup,
    IfcBuildingSystem => IfcSystem,
    IfcBuiltSystem => IfcSystem,
    IfcDistributionSystem => IfcSystem,
    IfcDistributionCircuit => IfcDistributionSystem,
    IfcElectricalCircuit => IfcSystem,
    IfcStructuralAnalysisModel => IfcSystem,
    IfcZone => IfcSystem,
    IfcProcess => IfcObject,
    IfcEvent => IfcProcess,
    IfcProcedure => IfcProcess,
    IfcTask => IfcProcess,
    IfcResource => IfcObject,
    IfcConstructionResource => IfcResource,
    IfcProduct => IfcObject,

    // Products that are not elements
    IfcAnnotation => IfcProduct,
    IfcGrid => IfcProduct,
    IfcProxy => IfcProduct,
    IfcPort => IfcProduct,
    IfcDistributionPort => IfcPort,
    IfcPositioningElement => IfcProduct,
    IfcLinearPositioningElement => IfcPositioningElement,
    IfcAlignment => IfcLinearPositioningElement,

    // Spatial structure
    IfcSpatialElement => IfcProduct,
    IfcSpatialStructureElement => IfcSpatialElement,
    IfcSite => IfcSpatialStructureElement,
    IfcBuilding => IfcSpatialStructureElement,
    IfcBuildingStorey => IfcSpatialStructureElement,
    IfcSpace => IfcSpatialStructureElement,
    IfcFacility => IfcSpatialStructureElement,
    IfcFacilityPart => IfcSpatialStructureElement,
    IfcBridge => IfcFacility,
    IfcRoad => IfcFacility,
    IfcRailway => IfcFacility,
    IfcMarineFacility => IfcFacility,
    IfcExternalSpatialStructureElement => IfcSpatialElement,
    IfcExternalSpatialElement => IfcExternalSpatialStructureElement,
    IfcSpatialZone => IfcSpatialElement,

    // Structural analysis
    IfcStructuralActivity => IfcProduct,
    IfcStructuralAction => IfcStructuralActivity,
    IfcStructuralPointAction => IfcStructuralAction,
    IfcStructuralCurveAction => IfcStructuralAction,
    IfcStructuralSurfaceAction => IfcStructuralAction,
    IfcStructuralReaction => IfcStructuralActivity,
    IfcStructuralPointReaction => IfcStructuralReaction,
    IfcStructuralItem => IfcProduct,
    IfcStructuralMember => IfcStructuralItem,
    IfcStructuralCurveMember => IfcStructuralMember,
    IfcStructuralCurveMemberVarying => IfcStructuralCurveMember,
    IfcStructuralSurfaceMember => IfcStructuralMember,
    IfcStructuralSurfaceMemberVarying => IfcStructuralSurfaceMember,
    IfcStructuralConnection => IfcStructuralItem,
    IfcStructuralPointConnection => IfcStructuralConnection,
    IfcStructuralCurveConnection => IfcStructuralConnection,
    IfcStructuralSurfaceConnection => IfcStructuralConnection,

    // Elements
    IfcElement => IfcProduct,
    IfcBuildingElement => IfcElement,
    IfcBuiltElement => IfcElement,
    IfcBeam => IfcBuildingElement,
    IfcBeamStandardCase => IfcBeam,
    IfcBuildingElementComponent => IfcBuildingElement,
    IfcBuildingElementProxy => IfcBuildingElement,
    IfcChimney => IfcBuildingElement,
    IfcColumn => IfcBuildingElement,
    IfcColumnStandardCase => IfcColumn,
    IfcCovering => IfcBuildingElement,
    IfcCurtainWall => IfcBuildingElement,
    IfcDoor => IfcBuildingElement,
    IfcDoorStandardCase => IfcDoor,
    IfcFooting => IfcBuildingElement,
    IfcMember => IfcBuildingElement,
    IfcMemberStandardCase => IfcMember,
    IfcPile => IfcBuildingElement,
    IfcPlate => IfcBuildingElement,
    IfcPlateStandardCase => IfcPlate,
    IfcRailing => IfcBuildingElement,
    IfcRamp => IfcBuildingElement,
    IfcRampFlight => IfcBuildingElement,
    IfcRoof => IfcBuildingElement,
    IfcShadingDevice => IfcBuildingElement,
    IfcSlab => IfcBuildingElement,
    IfcSlabElementedCase => IfcSlab,
    IfcSlabStandardCase => IfcSlab,
    IfcStair => IfcBuildingElement,
    IfcStairFlight => IfcBuildingElement,
    IfcWall => IfcBuildingElement,
    IfcWallElementedCase => IfcWall,
    IfcWallStandardCase => IfcWall,
    IfcWindow => IfcBuildingElement,
    IfcWindowStandardCase => IfcWindow,
    IfcElementAssembly => IfcElement,
    IfcElementComponent => IfcElement,
    IfcBuildingElementPart => IfcElementComponent,
    IfcDiscreteAccessory => IfcElementComponent,
    IfcFastener => IfcElementComponent,
    IfcMechanicalFastener => IfcElementComponent,
    IfcReinforcingElement => IfcElementComponent,
    IfcReinforcingBar => IfcReinforcingElement,
    IfcReinforcingMesh => IfcReinforcingElement,
    IfcTendon => IfcReinforcingElement,
    IfcTendonAnchor => IfcReinforcingElement,
    IfcFeatureElement => IfcElement,
    IfcFeatureElementSubtraction => IfcFeatureElement,
    IfcOpeningElement => IfcFeatureElementSubtraction,
    IfcOpeningStandardCase => IfcOpeningElement,
    IfcVoidingFeature => IfcFeatureElementSubtraction,
    IfcFeatureElementAddition => IfcFeatureElement,
    IfcProjectionElement => IfcFeatureElementAddition,
    IfcSurfaceFeature => IfcFeatureElement,
    IfcFurnishingElement => IfcElement,
    IfcFurniture => IfcFurnishingElement,
    IfcSystemFurnitureElement => IfcFurnishingElement,
    IfcCivilElement => IfcElement,
    IfcGeographicElement => IfcElement,
    IfcTransportElement => IfcElement,
    IfcVirtualElement => IfcElement,
    IfcDistributionElement => IfcElement,
    IfcDistributionControlElement => IfcDistributionElement,
    IfcActuator => IfcDistributionControlElement,
    IfcAlarm => IfcDistributionControlElement,
    IfcController => IfcDistributionControlElement,
    IfcSensor => IfcDistributionControlElement,
    IfcDistributionFlowElement => IfcDistributionElement,
    IfcDistributionChamberElement => IfcDistributionFlowElement,
    IfcEnergyConversionDevice => IfcDistributionFlowElement,
    IfcBoiler => IfcEnergyConversionDevice,
    IfcChiller => IfcEnergyConversionDevice,
    IfcFlowController => IfcDistributionFlowElement,
    IfcDamper => IfcFlowController,
    IfcSwitchingDevice => IfcFlowController,
    IfcValve => IfcFlowController,
    IfcFlowFitting => IfcDistributionFlowElement,
    IfcDuctFitting => IfcFlowFitting,
    IfcPipeFitting => IfcFlowFitting,
    IfcFlowMovingDevice => IfcDistributionFlowElement,
    IfcFan => IfcFlowMovingDevice,
    IfcPump => IfcFlowMovingDevice,
    IfcFlowSegment => IfcDistributionFlowElement,
    IfcCableCarrierSegment => IfcFlowSegment,
    IfcCableSegment => IfcFlowSegment,
    IfcDuctSegment => IfcFlowSegment,
    IfcPipeSegment => IfcFlowSegment,
    IfcFlowStorageDevice => IfcDistributionFlowElement,
    IfcTank => IfcFlowStorageDevice,
    IfcFlowTerminal => IfcDistributionFlowElement,
    IfcAirTerminal => IfcFlowTerminal,
    IfcLamp => IfcFlowTerminal,
    IfcLightFixture => IfcFlowTerminal,
    IfcOutlet => IfcFlowTerminal,
    IfcSanitaryTerminal => IfcFlowTerminal,
    IfcFlowTreatmentDevice => IfcDistributionFlowElement,

    // Controls, groups, processes and resources from IFC2x3 and IFC4x3
    IfcActionRequest => IfcControl,
    IfcProjectOrder => IfcControl,
    IfcProjectOrderRecord => IfcControl,
    IfcScheduleTimeControl => IfcControl,
    IfcServiceLife => IfcControl,
    IfcTimeSeriesSchedule => IfcControl,
    IfcSpaceProgram => IfcControl,
    IfcConditionCriterion => IfcControl,
    IfcEquipmentStandard => IfcControl,
    IfcFurnitureStandard => IfcControl,
    IfcCondition => IfcGroup,
    IfcMove => IfcTask,
    IfcOrderAction => IfcTask,
    IfcCrewResource => IfcConstructionResource,
    IfcConstructionEquipmentResource => IfcConstructionResource,
    IfcConstructionMaterialResource => IfcConstructionResource,
    IfcConstructionProductResource => IfcConstructionResource,
    IfcLaborResource => IfcConstructionResource,
    IfcSubContractResource => IfcConstructionResource,

    // Positioning and alignment (IFC4x1 onwards)
    IfcReferent => IfcPositioningElement,
    IfcLinearElement => IfcProduct,
    IfcAlignmentCant => IfcLinearElement,
    IfcAlignmentHorizontal => IfcLinearElement,
    IfcAlignmentVertical => IfcLinearElement,
    IfcAlignmentSegment => IfcLinearElement,

    // Facility parts (IFC4x3)
    IfcBridgePart => IfcFacilityPart,
    IfcFacilityPartCommon => IfcFacilityPart,
    IfcMarinePart => IfcFacilityPart,
    IfcRailwayPart => IfcFacilityPart,
    IfcRoadPart => IfcFacilityPart,

    // Structural activities beyond the IFC4 core
    IfcStructuralLinearAction => IfcStructuralCurveAction,
    IfcStructuralPlanarAction => IfcStructuralSurfaceAction,
    IfcStructuralLinearActionVarying => IfcStructuralLinearAction,
    IfcStructuralPlanarActionVarying => IfcStructuralPlanarAction,
    IfcStructuralCurveReaction => IfcStructuralReaction,
    IfcStructuralSurfaceReaction => IfcStructuralReaction,

    // Built elements introduced by IFC4x3
    IfcBearing => IfcBuiltElement,
    IfcCourse => IfcBuiltElement,
    IfcDeepFoundation => IfcBuiltElement,
    IfcCaissonFoundation => IfcDeepFoundation,
    IfcEarthworksElement => IfcBuiltElement,
    IfcEarthworksFill => IfcEarthworksElement,
    IfcReinforcedSoil => IfcEarthworksElement,
    IfcKerb => IfcBuiltElement,
    IfcMooringDevice => IfcBuiltElement,
    IfcNavigationElement => IfcBuiltElement,
    IfcPavement => IfcBuiltElement,
    IfcRail => IfcBuiltElement,
    IfcTrackElement => IfcBuiltElement,
    IfcEarthworksCut => IfcFeatureElementSubtraction,

    // Other element branches
    IfcElectricalElement => IfcElement,
    IfcEquipmentElement => IfcElement,
    IfcTransportationDevice => IfcElement,
    IfcVehicle => IfcTransportationDevice,
    IfcGeotechnicalElement => IfcElement,
    IfcGeotechnicalAssembly => IfcGeotechnicalElement,
    IfcBorehole => IfcGeotechnicalAssembly,
    IfcGeomodel => IfcGeotechnicalAssembly,
    IfcGeoslice => IfcGeotechnicalAssembly,
    IfcGeotechnicalStratum => IfcGeotechnicalElement,
    IfcEdgeFeature => IfcFeatureElementSubtraction,
    IfcChamferEdgeFeature => IfcEdgeFeature,
    IfcRoundedEdgeFeature => IfcEdgeFeature,
    IfcVibrationIsolator => IfcElementComponent,
    IfcVibrationDamper => IfcElementComponent,
    IfcImpactProtectionDevice => IfcElementComponent,
    IfcSign => IfcElementComponent,
    IfcTendonConduit => IfcReinforcingElement,

    // Distribution control
    IfcFlowInstrument => IfcDistributionControlElement,
    IfcProtectiveDeviceTrippingUnit => IfcDistributionControlElement,
    IfcUnitaryControlElement => IfcDistributionControlElement,

    // Energy conversion
    IfcAirToAirHeatRecovery => IfcEnergyConversionDevice,
    IfcBurner => IfcEnergyConversionDevice,
    IfcCoil => IfcEnergyConversionDevice,
    IfcCondenser => IfcEnergyConversionDevice,
    IfcCooledBeam => IfcEnergyConversionDevice,
    IfcCoolingTower => IfcEnergyConversionDevice,
    IfcElectricGenerator => IfcEnergyConversionDevice,
    IfcElectricMotor => IfcEnergyConversionDevice,
    IfcEngine => IfcEnergyConversionDevice,
    IfcEvaporativeCooler => IfcEnergyConversionDevice,
    IfcEvaporator => IfcEnergyConversionDevice,
    IfcHeatExchanger => IfcEnergyConversionDevice,
    IfcHumidifier => IfcEnergyConversionDevice,
    IfcMotorConnection => IfcEnergyConversionDevice,
    IfcSolarDevice => IfcEnergyConversionDevice,
    IfcTransformer => IfcEnergyConversionDevice,
    IfcTubeBundle => IfcEnergyConversionDevice,
    IfcUnitaryEquipment => IfcEnergyConversionDevice,

    // Flow control, fittings, moving devices, segments, storage
    IfcAirTerminalBox => IfcFlowController,
    IfcDistributionBoard => IfcFlowController,
    IfcElectricDistributionBoard => IfcFlowController,
    IfcElectricDistributionPoint => IfcFlowController,
    IfcElectricTimeControl => IfcFlowController,
    IfcFlowMeter => IfcFlowController,
    IfcProtectiveDevice => IfcFlowController,
    IfcCableCarrierFitting => IfcFlowFitting,
    IfcCableFitting => IfcFlowFitting,
    IfcJunctionBox => IfcFlowFitting,
    IfcCompressor => IfcFlowMovingDevice,
    IfcConveyorSegment => IfcFlowSegment,
    IfcElectricFlowStorageDevice => IfcFlowStorageDevice,

    // Flow terminals and treatment
    IfcAudioVisualAppliance => IfcFlowTerminal,
    IfcCommunicationsAppliance => IfcFlowTerminal,
    IfcElectricAppliance => IfcFlowTerminal,
    IfcFireSuppressionTerminal => IfcFlowTerminal,
    IfcLiquidTerminal => IfcFlowTerminal,
    IfcMedicalDevice => IfcFlowTerminal,
    IfcMobileTelecommunicationsAppliance => IfcFlowTerminal,
    IfcSignal => IfcFlowTerminal,
    IfcSpaceHeater => IfcFlowTerminal,
    IfcStackTerminal => IfcFlowTerminal,
    IfcWasteTerminal => IfcFlowTerminal,
    IfcDuctSilencer => IfcFlowTreatmentDevice,
    IfcElectricFlowTreatmentDevice => IfcFlowTreatmentDevice,
    IfcFilter => IfcFlowTreatmentDevice,
    IfcInterceptor => IfcFlowTreatmentDevice,

    // Relationships
    IfcRelConnects => IfcRelationship,
    IfcRelConnectsElements => IfcRelConnects,
    IfcRelConnectsPathElements => IfcRelConnectsElements,
    IfcRelConnectsWithRealizingElements => IfcRelConnectsElements,
    IfcRelConnectsStructuralMember => IfcRelConnects,
    IfcRelConnectsWithEccentricity => IfcRelConnectsStructuralMember,
    IfcRelConnectsStructuralActivity => IfcRelConnects,
    IfcRelConnectsPortToElement => IfcRelConnects,
    IfcRelConnectsPorts => IfcRelConnects,
    IfcRelContainedInSpatialStructure => IfcRelConnects,
    IfcRelCoversBldgElements => IfcRelConnects,
    IfcRelFillsElement => IfcRelConnects,
    IfcRelFlowControlElements => IfcRelConnects,
    IfcRelInterferesElements => IfcRelConnects,
    IfcRelReferencedInSpatialStructure => IfcRelConnects,
    IfcRelSequence => IfcRelConnects,
    IfcRelServicesBuildings => IfcRelConnects,
    IfcRelSpaceBoundary => IfcRelConnects,
    IfcRelSpaceBoundary1stLevel => IfcRelSpaceBoundary,
    IfcRelSpaceBoundary2ndLevel => IfcRelSpaceBoundary1stLevel,
    IfcRelDecomposes => IfcRelationship,
    IfcRelAggregates => IfcRelDecomposes,
    IfcRelNests => IfcRelDecomposes,
    IfcRelProjectsElement => IfcRelDecomposes,
    IfcRelVoidsElement => IfcRelDecomposes,
    IfcRelAssigns => IfcRelationship,
    IfcRelAssignsToActor => IfcRelAssigns,
    IfcRelAssignsToControl => IfcRelAssigns,
    IfcRelAssignsToGroup => IfcRelAssigns,
    IfcRelAssignsToGroupByFactor => IfcRelAssignsToGroup,
    IfcRelAssignsToProcess => IfcRelAssigns,
    IfcRelAssignsToProduct => IfcRelAssigns,
    IfcRelAssignsToResource => IfcRelAssigns,
    IfcRelAssociates => IfcRelationship,
    IfcRelAssociatesClassification => IfcRelAssociates,
    IfcRelAssociatesDocument => IfcRelAssociates,
    IfcRelAssociatesMaterial => IfcRelAssociates,
    IfcRelDeclares => IfcRelationship,
    IfcRelDefines => IfcRelationship,
    IfcRelDefinesByProperties => IfcRelDefines,
    IfcRelDefinesByType => IfcRelDefines,
}

static BY_KEYWORD: Lazy<HashMap<String, IfcClass>> = Lazy::new(|| {
    IfcClass::ALL
        .iter()
        .map(|class| (class.name().to_ascii_uppercase(), *class))
        .collect()
});

impl IfcClass {
    /// Look up a class by exchange-file keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        BY_KEYWORD.get(&keyword.to_ascii_uppercase()).copied()
    }

    /// Whether `self` is `other` or one of its subtypes.
    pub fn is_a(self, other: IfcClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.parent();
        }
        false
    }
}

impl std::fmt::Display for IfcClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
